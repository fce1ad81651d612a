//! Synthetic sensor telemetry: noise, rounding, and status classification.

pub mod current;
pub mod series;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use self::current::{generate_current_readings, overall_health, CurrentReadings};
pub use self::series::{generate_time_series, ForecastPoint, SeriesPoint, TimeSeries};

/// Three-level status shared by every sensor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Warning,
    Critical,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Warning => "warning",
            Status::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One synthetic sample at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub status: Status,
}

/// Draw `base` plus uniform noise in `[-variance, +variance)`.
pub fn sensor_value<R: Rng + ?Sized>(rng: &mut R, base: f64, variance: f64) -> f64 {
    base + (rng.gen::<f64>() - 0.5) * variance * 2.0
}

/// Round to the nearest integer with ties going toward positive infinity.
///
/// `f64::round` sends -2.5 to -3; the reported contract expects -2.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to `decimals` places with ties toward positive infinity.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    round_half_up(value * scale) / scale
}

/// Clamp a score to the 0..=100 range used when it is shown as a percentage.
pub fn percent_display(score: i64) -> u8 {
    score.clamp(0, 100) as u8
}

pub fn temperature_status(celsius: f64) -> Status {
    if celsius >= 85.0 {
        Status::Critical
    } else if celsius >= 75.0 {
        Status::Warning
    } else {
        Status::Normal
    }
}

pub fn vibration_status(mm_per_sec: f64) -> Status {
    if mm_per_sec >= 8.0 {
        Status::Critical
    } else if mm_per_sec >= 6.0 {
        Status::Warning
    } else {
        Status::Normal
    }
}

/// Structural health is higher-is-better, so the thresholds run the other way.
pub fn structural_status(percent: f64) -> Status {
    if percent >= 90.0 {
        Status::Normal
    } else if percent >= 80.0 {
        Status::Warning
    } else {
        Status::Critical
    }
}

/// Band the composite health score: >= 90 stable, >= 75 warning, else critical.
pub fn health_status(score: i64) -> Status {
    if score >= 90 {
        Status::Normal
    } else if score >= 75 {
        Status::Warning
    } else {
        Status::Critical
    }
}
