//! Supervisor alerts and the acknowledgement reducer.

use crate::error::SimError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Emergency,
    Warning,
    Info,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Emergency => "emergency",
            AlertKind::Warning => "warning",
            AlertKind::Info => "info",
        }
    }
}

impl FromStr for AlertKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "emergency" => Ok(AlertKind::Emergency),
            "warning" => Ok(AlertKind::Warning),
            "info" => Ok(AlertKind::Info),
            _ => Err(SimError::UnknownFilter {
                kind: "alert type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub machine_id: String,
    /// Percent, 0..=100.
    pub failure_probability: u8,
    pub acknowledged: bool,
}

impl Alert {
    pub fn risk(&self) -> FailureRisk {
        FailureRisk::from_probability(self.failure_probability)
    }
}

/// Colour band of the failure-probability figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureRisk {
    High,
    Elevated,
    Low,
}

impl FailureRisk {
    pub fn from_probability(percent: u8) -> Self {
        if percent >= 70 {
            FailureRisk::High
        } else if percent >= 40 {
            FailureRisk::Elevated
        } else {
            FailureRisk::Low
        }
    }
}

/// The fixed alert set, timestamped relative to `now`.
pub fn generate_alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert {
            id: "ALERT-001".to_string(),
            timestamp: now - Duration::minutes(5),
            kind: AlertKind::Emergency,
            title: "Critical Temperature Threshold Exceeded".to_string(),
            description: String::from(
                "Robot Arm 4 - Axis 3 Bearing operating at 87°C. Immediate inspection required.",
            ),
            machine_id: "ROBO-4".to_string(),
            failure_probability: 78,
            acknowledged: false,
        },
        Alert {
            id: "ALERT-002".to_string(),
            timestamp: now - Duration::minutes(25),
            kind: AlertKind::Warning,
            title: "Predictive Maintenance Due".to_string(),
            description: String::from(
                "CNC Mill 2 showing early signs of bearing wear. Schedule maintenance within 48 hours.",
            ),
            machine_id: "CNC-002".to_string(),
            failure_probability: 45,
            acknowledged: false,
        },
        Alert {
            id: "ALERT-003".to_string(),
            timestamp: now - Duration::hours(2),
            kind: AlertKind::Info,
            title: "PyTorch Analysis Complete".to_string(),
            description: String::from(
                "Edge-to-Cloud streaming inference completed for Assembly Line A. No anomalies detected.",
            ),
            machine_id: "ASM-A".to_string(),
            failure_probability: 5,
            acknowledged: true,
        },
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    pub total: usize,
    pub unacknowledged: usize,
    pub emergency: usize,
    pub warning: usize,
    pub info: usize,
}

/// Owned alert list with reducer-style acknowledgement.
///
/// Acknowledgements live only as long as the board; [`AlertBoard::reset`]
/// regenerates the catalog and drops them.
#[derive(Debug, Clone)]
pub struct AlertBoard {
    alerts: Vec<Alert>,
}

impl AlertBoard {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            alerts: generate_alerts(now),
        }
    }

    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn into_alerts(self) -> Vec<Alert> {
        self.alerts
    }

    /// Acknowledge the alert with `id`. Returns false if no alert has that id.
    pub fn acknowledge(&mut self, id: &str) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                if !alert.acknowledged {
                    info!(alert = %id, "Alert acknowledged");
                }
                alert.acknowledged = true;
                true
            }
            None => {
                debug!(alert = %id, "Acknowledge ignored, no such alert");
                false
            }
        }
    }

    /// Acknowledge everything. Returns how many alerts changed state.
    pub fn acknowledge_all(&mut self) -> usize {
        let mut changed = 0;
        for alert in self.alerts.iter_mut().filter(|a| !a.acknowledged) {
            alert.acknowledged = true;
            changed += 1;
        }
        if changed > 0 {
            info!(count = changed, "All alerts acknowledged");
        }
        changed
    }

    /// Regenerate the catalog, discarding local acknowledgements.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.alerts = generate_alerts(now);
    }

    /// `None` selects every type.
    pub fn filtered(&self, kind: Option<AlertKind>) -> Vec<&Alert> {
        self.alerts
            .iter()
            .filter(|a| kind.map_or(true, |k| a.kind == k))
            .collect()
    }

    pub fn counts(&self) -> AlertCounts {
        let by_kind = |k: AlertKind| self.alerts.iter().filter(|a| a.kind == k).count();
        AlertCounts {
            total: self.alerts.len(),
            unacknowledged: self.alerts.iter().filter(|a| !a.acknowledged).count(),
            emergency: by_kind(AlertKind::Emergency),
            warning: by_kind(AlertKind::Warning),
            info: by_kind(AlertKind::Info),
        }
    }

    /// Whether "acknowledge all" has anything to do.
    pub fn has_unacknowledged(&self) -> bool {
        self.alerts.iter().any(|a| !a.acknowledged)
    }
}
