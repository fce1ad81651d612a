//! TOML configuration for the simulator.
//!
//! Every field has a compiled-in default, so a partial or empty file is
//! valid. Lookup order: explicit path, `FORGEWATCH_CONFIG`, `./forgewatch.toml`,
//! defaults.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Environment variable naming a config file to load.
pub const CONFIG_ENV: &str = "FORGEWATCH_CONFIG";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG: &str = "forgewatch.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub cadence: CadenceConfig,
    #[serde(default)]
    pub series: SeriesConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded simulator configuration");
        Ok(config)
    }

    /// Resolve the configuration.
    ///
    /// An explicit path must load; the fallbacks only warn when broken.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = Path::new(&env_path);
            match Self::load(path) {
                Ok(cfg) => return Ok(cfg),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "FORGEWATCH_CONFIG set but file could not be loaded, trying fallback"
                    );
                }
            }
        }

        let local = Path::new(LOCAL_CONFIG);
        if local.exists() {
            match Self::load(local) {
                Ok(cfg) => return Ok(cfg),
                Err(e) => {
                    warn!(
                        path = %local.display(),
                        error = %e,
                        "local config file exists but could not be loaded, using defaults"
                    );
                }
            }
        }

        debug!("no config file found, using compiled-in defaults");
        Ok(Self::default())
    }
}

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// Refresh periods of the live views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Stat-card snapshot period on the main view.
    pub readings_secs: u64,
    /// Header health badge period.
    pub header_secs: u64,
    /// Full time-series regeneration period.
    pub series_secs: u64,
    /// Artificial latency of a vision scan.
    pub scan_delay_ms: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            readings_secs: 3,
            header_secs: 5,
            series_secs: 30,
            scan_delay_ms: 2000,
        }
    }
}

impl CadenceConfig {
    // Zero periods would make tokio::time::interval panic; floor at 1.
    pub fn readings_period(&self) -> Duration {
        Duration::from_secs(self.readings_secs.max(1))
    }

    pub fn header_period(&self) -> Duration {
        Duration::from_secs(self.header_secs.max(1))
    }

    pub fn series_period(&self) -> Duration {
        Duration::from_secs(self.series_secs.max(1))
    }

    pub fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Series window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// History shown on the dashboard charts.
    pub hours: u32,
    /// Minutes between chart points.
    pub interval_minutes: u32,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            hours: 12,
            interval_minutes: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Fixed RNG seed for reproducible output. Entropy-seeded when absent.
    pub seed: Option<u64>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level (`trace`, `debug`, `info`, `warn`, `error`).
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = SimConfig::default();

        assert_eq!(cfg.cadence.readings_period(), Duration::from_secs(3));
        assert_eq!(cfg.cadence.header_period(), Duration::from_secs(5));
        assert_eq!(cfg.cadence.series_period(), Duration::from_secs(30));
        assert_eq!(cfg.cadence.scan_delay(), Duration::from_secs(2));

        assert_eq!(cfg.series.hours, 12);
        assert_eq!(cfg.series.interval_minutes, 30);

        assert!(cfg.simulator.seed.is_none());
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[cadence]
readings_secs = 1
header_secs = 2
series_secs = 10
scan_delay_ms = 500

[series]
hours = 24
interval_minutes = 15

[simulator]
seed = 1234

[logging]
level = "debug"
json = true
"#;

        let cfg: SimConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(cfg.cadence.readings_secs, 1);
        assert_eq!(cfg.cadence.header_secs, 2);
        assert_eq!(cfg.cadence.series_secs, 10);
        assert_eq!(cfg.cadence.scan_delay(), Duration::from_millis(500));
        assert_eq!(cfg.series.hours, 24);
        assert_eq!(cfg.series.interval_minutes, 15);
        assert_eq!(cfg.simulator.seed, Some(1234));
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.json);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: SimConfig = toml::from_str("[cadence]\nreadings_secs = 7\n").unwrap();

        assert_eq!(cfg.cadence.readings_secs, 7);
        assert_eq!(cfg.cadence.header_secs, 5);
        assert_eq!(cfg.series.hours, 12);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_zero_period_is_floored() {
        let cfg: SimConfig = toml::from_str("[cadence]\nseries_secs = 0\n").unwrap();
        assert_eq!(cfg.cadence.series_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("forgewatch.toml");
        std::fs::write(&path, "[simulator]\nseed = 99\n").unwrap();

        let cfg = SimConfig::load(&path).unwrap();
        assert_eq!(cfg.simulator.seed, Some(99));

        let resolved = SimConfig::resolve(Some(path.as_path())).unwrap();
        assert_eq!(resolved.simulator.seed, Some(99));
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let result = SimConfig::resolve(Some(Path::new("/nonexistent/forgewatch.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut cfg = SimConfig::default();
        cfg.simulator.seed = Some(5);
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let back: SimConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(back.simulator.seed, Some(5));
        assert_eq!(back.cadence.series_secs, cfg.cadence.series_secs);
    }
}
