use super::{
    round_half_up, round_to, sensor_value, structural_status, temperature_status,
    vibration_status, SensorReading,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const TEMPERATURE_BASE: f64 = 76.0;
const TEMPERATURE_VARIANCE: f64 = 8.0;
const VIBRATION_BASE: f64 = 5.2;
const VIBRATION_VARIANCE: f64 = 2.0;
const STRUCTURAL_BASE: f64 = 92.0;
const STRUCTURAL_VARIANCE: f64 = 5.0;

/// Snapshot behind the stat cards and the header health badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentReadings {
    pub temperature: SensorReading,
    pub vibration: SensorReading,
    pub structural: SensorReading,
    /// Weighted composite, not clamped. See [`super::percent_display`].
    pub overall_health: i64,
}

/// Weighted composite of the three channels.
///
/// Penalties use strict comparisons (temp > 85, > 75; vibration > 8, > 6),
/// unlike the inclusive status thresholds.
pub fn overall_health(temperature: f64, vibration: f64, structural: f64) -> i64 {
    let temp_penalty = if temperature > 85.0 {
        30.0
    } else if temperature > 75.0 {
        15.0
    } else {
        0.0
    };
    let vib_penalty = if vibration > 8.0 {
        30.0
    } else if vibration > 6.0 {
        15.0
    } else {
        0.0
    };

    let composite =
        (100.0 - temp_penalty) * 0.35 + (100.0 - vib_penalty) * 0.35 + structural * 0.30;
    round_half_up(composite) as i64
}

/// Sample one independent snapshot of every channel.
///
/// Status and composite are computed from the raw draws; only the reported
/// values are rounded.
pub fn generate_current_readings<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
) -> CurrentReadings {
    let temp = sensor_value(rng, TEMPERATURE_BASE, TEMPERATURE_VARIANCE);
    let vib = sensor_value(rng, VIBRATION_BASE, VIBRATION_VARIANCE);
    let structural = sensor_value(rng, STRUCTURAL_BASE, STRUCTURAL_VARIANCE);

    CurrentReadings {
        temperature: SensorReading {
            timestamp: now,
            value: round_to(temp, 1),
            status: temperature_status(temp),
        },
        vibration: SensorReading {
            timestamp: now,
            value: round_to(vib, 2),
            status: vibration_status(vib),
        },
        structural: SensorReading {
            timestamp: now,
            value: round_to(structural, 1),
            status: structural_status(structural),
        },
        overall_health: overall_health(temp, vib, structural),
    }
}
