//! Historical series behind the forecast charts.

use super::{round_to, sensor_value};
use crate::error::SimError;
use chrono::{DateTime, Duration, Local, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Chart point with a forecast overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: String,
    pub value: f64,
    pub predicted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: String,
    pub value: f64,
}

/// Three aligned channels, oldest point first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub temperature: Vec<ForecastPoint>,
    pub vibration: Vec<ForecastPoint>,
    pub structural: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

/// Upper bound on points per channel; roughly two months at one-minute spacing.
pub const MAX_SERIES_POINTS: usize = 100_000;

/// Transient event window, exclusive at both ends (minutes before now).
fn in_event_window(offset: f64) -> bool {
    offset > 120.0 && offset < 180.0
}

/// `hh:mm AM/PM` in local time.
pub fn time_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%I:%M %p").to_string()
}

/// Number of points a window yields, or why it is rejected.
pub fn window_points(hours: u32, interval_minutes: u32) -> Result<usize, SimError> {
    if interval_minutes == 0 {
        return Err(SimError::InvalidWindow { interval_minutes });
    }

    let points = u64::from(hours) * 60 / u64::from(interval_minutes) + 1;
    match usize::try_from(points) {
        Ok(n) if n <= MAX_SERIES_POINTS => Ok(n),
        _ => Err(SimError::WindowTooLarge {
            hours,
            interval_minutes,
            max_points: MAX_SERIES_POINTS,
        }),
    }
}

/// Generate `hours` of history sampled every `interval_minutes`, ending at `now`.
///
/// Offsets count down from `hours * 60` and stop at the last value >= 0, so
/// a window that is not a multiple of the interval never lands exactly on now.
pub fn generate_time_series<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    hours: u32,
    interval_minutes: u32,
) -> Result<TimeSeries, SimError> {
    let capacity = window_points(hours, interval_minutes)?;
    let total = i64::from(hours) * 60;
    let step = i64::from(interval_minutes);

    let mut series = TimeSeries {
        temperature: Vec::with_capacity(capacity),
        vibration: Vec::with_capacity(capacity),
        structural: Vec::with_capacity(capacity),
    };

    let mut offset = total;
    while offset >= 0 {
        let label = time_label(now - Duration::minutes(offset));
        let i = offset as f64;

        let temp_base = 72.0 + (i / 120.0).sin() * 8.0;
        let temp_spike = if in_event_window(i) { 15.0 } else { 0.0 };
        let temp_value = sensor_value(rng, temp_base + temp_spike, 3.0);
        let temp_predicted = temp_base + 2.0 + if i < 60.0 { 5.0 } else { 0.0 };

        let vib_base = 4.0 + (i / 90.0).cos() * 1.5;
        let vib_value = sensor_value(rng, vib_base, 0.8);
        let vib_predicted = vib_base + 0.5;

        let structural = 95.0
            - (i / 200.0).sin().abs() * 8.0
            - if in_event_window(i) { 5.0 } else { 0.0 };

        series.temperature.push(ForecastPoint {
            time: label.clone(),
            value: round_to(temp_value, 1),
            predicted: round_to(temp_predicted, 1),
        });
        series.vibration.push(ForecastPoint {
            time: label.clone(),
            value: round_to(vib_value, 2),
            predicted: round_to(vib_predicted, 2),
        });
        series.structural.push(SeriesPoint {
            time: label,
            value: round_to(structural, 1),
        });

        offset -= step;
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn series(hours: u32, interval: u32) -> TimeSeries {
        let mut rng = StdRng::seed_from_u64(11);
        generate_time_series(&mut rng, Utc::now(), hours, interval).unwrap()
    }

    #[test]
    fn test_dashboard_window_has_25_aligned_points() {
        let s = series(12, 30);
        assert_eq!(s.temperature.len(), 25);
        assert_eq!(s.vibration.len(), 25);
        assert_eq!(s.structural.len(), 25);
        for (t, st) in s.temperature.iter().zip(&s.structural) {
            assert_eq!(t.time, st.time);
        }
    }

    #[test]
    fn test_last_point_is_now() {
        let s = series(12, 30);
        let last = s.len() - 1;
        // offset 0: forecast bump applies, structural has no dip
        assert_eq!(s.temperature[last].predicted, 79.0);
        assert_eq!(s.vibration[last].predicted, 6.0);
        assert_eq!(s.structural[last].value, 95.0);
    }

    #[test]
    fn test_event_window_dips_structural() {
        // offset 150 is the 20th point of a 12h/30min window (720, 690, ... 150)
        let s = series(12, 30);
        let idx = ((720 - 150) / 30) as usize;
        let expected = round_to(95.0 - (150.0f64 / 200.0).sin().abs() * 8.0 - 5.0, 1);
        assert_eq!(s.structural[idx].value, expected);

        // the spike adds 15 on top of +/- 3 noise
        let base = 72.0 + (150.0f64 / 120.0).sin() * 8.0;
        assert!(s.temperature[idx].value >= round_to(base + 12.0, 1));
    }

    #[test]
    fn test_window_boundaries_are_exclusive() {
        // 24h/60min hits offsets 120 and 180 exactly; neither is dipped.
        let s = series(24, 60);
        let at = |offset: usize| (24 * 60 - offset) / 60;
        for offset in [120usize, 180] {
            let i = offset as f64;
            let expected = round_to(95.0 - (i / 200.0).sin().abs() * 8.0, 1);
            assert_eq!(s.structural[at(offset)].value, expected);
        }
    }

    #[test]
    fn test_uneven_window_stops_before_now() {
        // offsets 60, 35, 10
        let s = series(1, 25);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_zero_hours_yields_single_point() {
        assert_eq!(series(0, 30).len(), 1);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = generate_time_series(&mut rng, Utc::now(), 12, 0).unwrap_err();
        assert_eq!(err, SimError::InvalidWindow { interval_minutes: 0 });
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = generate_time_series(&mut rng, Utc::now(), u32::MAX, 1).unwrap_err();
        assert!(matches!(err, SimError::WindowTooLarge { hours: u32::MAX, .. }));
    }

    #[test]
    fn test_window_point_limit_is_inclusive() {
        assert_eq!(window_points(12, 30), Ok(25));
        // 1666 h = 99_960 min; 1667 h = 100_020 min
        assert_eq!(window_points(1_666, 1), Ok(99_961));
        assert!(window_points(1_667, 1).is_err());
        // 100_000 points exactly: 99_999 * 60 minutes at 60 min spacing
        assert_eq!(window_points(99_999, 60), Ok(MAX_SERIES_POINTS));
        assert!(window_points(100_000, 60).is_err());
        assert_eq!(window_points(u32::MAX, u32::MAX), Ok(61));
    }

    #[test]
    fn test_time_label_format() {
        let label = time_label(Utc::now());
        assert_eq!(label.len(), 8);
        assert!(label.ends_with("AM") || label.ends_with("PM"));
        assert_eq!(&label[2..3], ":");
    }
}
