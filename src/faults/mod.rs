//! Micro-fault detections reported by the vision system.

use crate::error::SimError;
use crate::telemetry::{round_half_up, sensor_value};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Faults produced per batch.
pub const BATCH_SIZE: usize = 8;

/// Spacing between consecutive detections in a batch.
pub const DETECTION_SPACING_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultType {
    Thermal,
    Vibration,
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FaultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultType::Thermal => "thermal",
            FaultType::Vibration => "vibration",
            FaultType::Structural => "structural",
        }
    }
}

impl FaultSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultSeverity::Low => "low",
            FaultSeverity::Medium => "medium",
            FaultSeverity::High => "high",
            FaultSeverity::Critical => "critical",
        }
    }
}

impl FromStr for FaultType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "thermal" => Ok(FaultType::Thermal),
            "vibration" => Ok(FaultType::Vibration),
            "structural" => Ok(FaultType::Structural),
            _ => Err(SimError::UnknownFilter {
                kind: "fault type",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for FaultSeverity {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(FaultSeverity::Low),
            "medium" => Ok(FaultSeverity::Medium),
            "high" => Ok(FaultSeverity::High),
            "critical" => Ok(FaultSeverity::Critical),
            _ => Err(SimError::UnknownFilter {
                kind: "fault severity",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroFault {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub fault_type: FaultType,
    pub severity: FaultSeverity,
    pub description: String,
    pub machine_id: String,
    pub machine_name: String,
    /// `92 +/- 8`, rounded.
    pub confidence: i64,
}

struct Archetype {
    fault_type: FaultType,
    desc: &'static str,
    severity: FaultSeverity,
}

struct Machine {
    id: &'static str,
    name: &'static str,
}

const ARCHETYPES: [Archetype; 4] = [
    Archetype {
        fault_type: FaultType::Thermal,
        desc: "Thermal Spike on",
        severity: FaultSeverity::High,
    },
    Archetype {
        fault_type: FaultType::Vibration,
        desc: "Vibration Anomaly on",
        severity: FaultSeverity::Medium,
    },
    Archetype {
        fault_type: FaultType::Structural,
        desc: "Micro-crack Detected on",
        severity: FaultSeverity::Critical,
    },
    Archetype {
        fault_type: FaultType::Thermal,
        desc: "Heat Dissipation Warning on",
        severity: FaultSeverity::Low,
    },
];

const MACHINES: [Machine; 5] = [
    Machine {
        id: "CNC-002",
        name: "CNC Mill 2",
    },
    Machine {
        id: "CNC-001",
        name: "CNC Mill 1",
    },
    Machine {
        id: "CONV-A",
        name: "Conveyor Belt A",
    },
    Machine {
        id: "ROBO-4",
        name: "Robot Arm 4",
    },
    Machine {
        id: "WELD-9",
        name: "Welder AW-9",
    },
];

/// Generate one batch of detections, newest first.
pub fn generate_micro_faults<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Vec<MicroFault> {
    let mut faults = Vec::with_capacity(BATCH_SIZE);

    for i in 0..BATCH_SIZE {
        let fault = &ARCHETYPES[rng.gen_range(0..ARCHETYPES.len())];
        let machine = &MACHINES[rng.gen_range(0..MACHINES.len())];

        faults.push(MicroFault {
            id: format!("FAULT-{:04}", i + 1),
            timestamp: now - Duration::minutes(i as i64 * DETECTION_SPACING_MINUTES),
            fault_type: fault.fault_type,
            severity: fault.severity,
            description: format!("{} {}", fault.desc, machine.name),
            machine_id: machine.id.to_string(),
            machine_name: machine.name.to_string(),
            confidence: round_half_up(sensor_value(rng, 92.0, 8.0)) as i64,
        });
    }

    // Construction order is already newest first; the sort keeps it that
    // way if generation order ever changes.
    faults.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    faults
}

/// Per-category counts shown on the vision log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FaultStats {
    pub thermal: usize,
    pub vibration: usize,
    pub structural: usize,
    pub critical: usize,
}

impl FaultStats {
    pub fn from_faults(faults: &[MicroFault]) -> Self {
        let by_type = |t: FaultType| faults.iter().filter(|f| f.fault_type == t).count();
        Self {
            thermal: by_type(FaultType::Thermal),
            vibration: by_type(FaultType::Vibration),
            structural: by_type(FaultType::Structural),
            critical: faults
                .iter()
                .filter(|f| f.severity == FaultSeverity::Critical)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FaultFilter {
    pub fault_type: Option<FaultType>,
    pub severity: Option<FaultSeverity>,
}

impl FaultFilter {
    pub fn matches(&self, fault: &MicroFault) -> bool {
        self.fault_type.map_or(true, |t| fault.fault_type == t)
            && self.severity.map_or(true, |s| fault.severity == s)
    }

    pub fn apply<'a>(&self, faults: &'a [MicroFault]) -> Vec<&'a MicroFault> {
        faults.iter().filter(|f| self.matches(f)).collect()
    }
}
