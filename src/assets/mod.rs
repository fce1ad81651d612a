//! Monitored asset fleet: health scores and maintenance countdowns.

use crate::error::SimError;
use crate::telemetry::{round_half_up, sensor_value};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Legacy,
    Modern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Operational,
    Warning,
    Critical,
    Maintenance,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Legacy => "legacy",
            AssetKind::Modern => "modern",
        }
    }
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Operational => "operational",
            AssetStatus::Warning => "warning",
            AssetStatus::Critical => "critical",
            AssetStatus::Maintenance => "maintenance",
        }
    }
}

impl FromStr for AssetKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(AssetKind::Legacy),
            "modern" => Ok(AssetKind::Modern),
            _ => Err(SimError::UnknownFilter {
                kind: "asset type",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for AssetStatus {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "operational" => Ok(AssetStatus::Operational),
            "warning" => Ok(AssetStatus::Warning),
            "critical" => Ok(AssetStatus::Critical),
            "maintenance" => Ok(AssetStatus::Maintenance),
            _ => Err(SimError::UnknownFilter {
                kind: "asset status",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// `85 +/- 15`, rounded. Not clamped.
    pub health_score: i64,
    /// `45 +/- 40`, rounded. Negative means overdue.
    pub days_until_maintenance: i64,
    pub last_inspection: DateTime<Utc>,
    pub status: AssetStatus,
    pub location: String,
}

impl Asset {
    pub fn health_band(&self) -> HealthBand {
        HealthBand::from_score(self.health_score)
    }

    pub fn maintenance_urgency(&self) -> MaintenanceUrgency {
        MaintenanceUrgency::from_days(self.days_until_maintenance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    Good,
    Fair,
    Poor,
}

impl HealthBand {
    pub fn from_score(score: i64) -> Self {
        if score >= 85 {
            HealthBand::Good
        } else if score >= 70 {
            HealthBand::Fair
        } else {
            HealthBand::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceUrgency {
    OnTrack,
    Soon,
    Due,
    Overdue,
}

impl MaintenanceUrgency {
    pub fn from_days(days: i64) -> Self {
        if days > 30 {
            MaintenanceUrgency::OnTrack
        } else if days > 14 {
            MaintenanceUrgency::Soon
        } else if days >= 0 {
            MaintenanceUrgency::Due
        } else {
            MaintenanceUrgency::Overdue
        }
    }
}

struct AssetTemplate {
    name: &'static str,
    kind: AssetKind,
    location: &'static str,
}

const CATALOG: [AssetTemplate; 8] = [
    AssetTemplate {
        name: "CNC Mill Alpha-7",
        kind: AssetKind::Modern,
        location: "Assembly Line A",
    },
    AssetTemplate {
        name: "Robot Arm - Axis 3 Bearing",
        kind: AssetKind::Modern,
        location: "Welding Station B",
    },
    AssetTemplate {
        name: "Conveyor Belt System A",
        kind: AssetKind::Legacy,
        location: "Main Production Floor",
    },
    AssetTemplate {
        name: "Hydraulic Press Unit 12",
        kind: AssetKind::Legacy,
        location: "Forming Section C",
    },
    AssetTemplate {
        name: "Laser Cutter LC-500",
        kind: AssetKind::Modern,
        location: "Precision Cutting Bay",
    },
    AssetTemplate {
        name: "Industrial Furnace F3",
        kind: AssetKind::Legacy,
        location: "Heat Treatment Zone",
    },
    AssetTemplate {
        name: "Automated Welder AW-9",
        kind: AssetKind::Modern,
        location: "Welding Station A",
    },
    AssetTemplate {
        name: "Compressor Unit CU-4",
        kind: AssetKind::Legacy,
        location: "Utilities Section",
    },
];

const INSPECTION_LOOKBACK_MS: f64 = 30.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Generate the full fleet with fresh scores. Regenerating never carries
/// anything over from a previous call.
pub fn generate_assets<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Vec<Asset> {
    CATALOG
        .iter()
        .enumerate()
        .map(|(index, template)| {
            let health_score = round_half_up(sensor_value(rng, 85.0, 15.0)) as i64;
            let days_until_maintenance = round_half_up(sensor_value(rng, 45.0, 40.0)) as i64;
            let lookback = rng.gen::<f64>() * INSPECTION_LOOKBACK_MS;

            Asset {
                id: format!("ASSET-{:03}", index + 1),
                name: template.name.to_string(),
                kind: template.kind,
                health_score,
                days_until_maintenance,
                last_inspection: now - Duration::milliseconds(lookback as i64),
                status: match index {
                    1 => AssetStatus::Warning,
                    3 => AssetStatus::Maintenance,
                    _ => AssetStatus::Operational,
                },
                location: template.location.to_string(),
            }
        })
        .collect()
}

/// Search and dropdown filters of the asset table. `None` means "all".
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub search: String,
    pub kind: Option<AssetKind>,
    pub status: Option<AssetStatus>,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        let query = self.search.to_lowercase();
        let matches_search = asset.name.to_lowercase().contains(&query)
            || asset.id.to_lowercase().contains(&query);
        let matches_kind = self.kind.map_or(true, |k| asset.kind == k);
        let matches_status = self.status.map_or(true, |s| asset.status == s);

        matches_search && matches_kind && matches_status
    }

    pub fn apply<'a>(&self, assets: &'a [Asset]) -> Vec<&'a Asset> {
        assets.iter().filter(|a| self.matches(a)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub total: usize,
    pub operational: usize,
    pub warning: usize,
    pub critical: usize,
    pub maintenance: usize,
}

impl AssetSummary {
    pub fn from_assets(assets: &[Asset]) -> Self {
        let count = |status: AssetStatus| assets.iter().filter(|a| a.status == status).count();
        Self {
            total: assets.len(),
            operational: count(AssetStatus::Operational),
            warning: count(AssetStatus::Warning),
            critical: count(AssetStatus::Critical),
            maintenance: count(AssetStatus::Maintenance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fleet(seed: u64) -> Vec<Asset> {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_assets(&mut rng, Utc::now())
    }

    #[test]
    fn test_fleet_follows_catalog() {
        let assets = fleet(1);
        assert_eq!(assets.len(), 8);
        assert_eq!(assets[0].id, "ASSET-001");
        assert_eq!(assets[7].id, "ASSET-008");
        assert_eq!(assets[1].name, "Robot Arm - Axis 3 Bearing");
        assert_eq!(assets[1].status, AssetStatus::Warning);
        assert_eq!(assets[3].status, AssetStatus::Maintenance);
        assert_eq!(assets[5].kind, AssetKind::Legacy);
        assert_eq!(assets[4].location, "Precision Cutting Bay");
    }

    #[test]
    fn test_scores_stay_within_raw_generator_range() {
        // Raw range, not a clamped percentage: 85 +/- 15 and 45 +/- 40.
        let now = Utc::now();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for a in generate_assets(&mut rng, now) {
                assert!((70..=100).contains(&a.health_score), "{}", a.health_score);
                assert!((5..=85).contains(&a.days_until_maintenance));
                assert!(a.last_inspection <= now);
                assert!(a.last_inspection > now - Duration::days(30));
            }
        }
    }

    #[test]
    fn test_regenerate_draws_fresh_scores() {
        let mut rng = StdRng::seed_from_u64(5);
        let now = Utc::now();
        let first = generate_assets(&mut rng, now);
        let second = generate_assets(&mut rng, now);
        assert_ne!(first, second);
    }

    #[test]
    fn test_filter_search_is_case_insensitive_on_name_and_id() {
        let assets = fleet(2);
        let by_name = AssetFilter { search: "laser".into(), ..Default::default() };
        assert_eq!(by_name.apply(&assets).len(), 1);

        let by_id = AssetFilter { search: "asset-00".into(), ..Default::default() };
        assert_eq!(by_id.apply(&assets).len(), 8);
    }

    #[test]
    fn test_filter_combines_type_and_status() {
        let assets = fleet(3);
        let legacy = AssetFilter { kind: Some(AssetKind::Legacy), ..Default::default() };
        assert_eq!(legacy.apply(&assets).len(), 4);

        let legacy_maint = AssetFilter {
            kind: Some(AssetKind::Legacy),
            status: Some(AssetStatus::Maintenance),
            ..Default::default()
        };
        let hits = legacy_maint.apply(&assets);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Hydraulic Press Unit 12");
    }

    #[test]
    fn test_summary_counts() {
        let summary = AssetSummary::from_assets(&fleet(4));
        assert_eq!(summary.total, 8);
        assert_eq!(summary.operational, 6);
        assert_eq!(summary.warning, 1);
        assert_eq!(summary.maintenance, 1);
        assert_eq!(summary.critical, 0);
    }

    #[test]
    fn test_bands() {
        assert_eq!(HealthBand::from_score(85), HealthBand::Good);
        assert_eq!(HealthBand::from_score(70), HealthBand::Fair);
        assert_eq!(HealthBand::from_score(69), HealthBand::Poor);
        assert_eq!(MaintenanceUrgency::from_days(31), MaintenanceUrgency::OnTrack);
        assert_eq!(MaintenanceUrgency::from_days(30), MaintenanceUrgency::Soon);
        assert_eq!(MaintenanceUrgency::from_days(14), MaintenanceUrgency::Due);
        assert_eq!(MaintenanceUrgency::from_days(-1), MaintenanceUrgency::Overdue);
    }

    #[test]
    fn test_filter_values_parse() {
        assert_eq!("Modern".parse::<AssetKind>().unwrap(), AssetKind::Modern);
        assert!("hybrid".parse::<AssetKind>().is_err());
        assert_eq!("maintenance".parse::<AssetStatus>().unwrap(), AssetStatus::Maintenance);
    }
}
