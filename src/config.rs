use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::data::model::Column;

/// Optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "powerpedal_dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default, so an absent file or a
/// partial one is fine:
///
/// ```json
/// { "data_path": "runs/2024-05-01.csv", "max_points": 2000 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Telemetry file opened at startup.
    pub data_path: PathBuf,
    /// Upper bound on points per chart.
    pub max_points: usize,
    /// Metrics checked when a file is opened, by exact column name.
    pub default_metrics: Vec<String>,
    /// Initial window size in logical pixels.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("powerpedal_test_results.csv"),
            max_points: 1000,
            default_metrics: [Column::BatteryPower, Column::BatteryVoltage, Column::Speed]
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            window_size: [1200.0, 800.0],
        }
    }
}

impl DashboardConfig {
    /// Read [`CONFIG_FILE`] from the working directory, falling back to the
    /// defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE}, using defaults");
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid settings JSON")?;
        if config.max_points == 0 {
            bail!("max_points must be at least 1");
        }
        Ok(config)
    }

    /// Resolved default metrics; unknown or non-plottable names are skipped.
    pub fn default_columns(&self) -> Vec<Column> {
        self.default_metrics
            .iter()
            .filter_map(|name| match Column::from_name(name) {
                Some(c) if Column::METRICS.contains(&c) => Some(c),
                _ => {
                    log::warn!("Ignoring unknown default metric '{name}'");
                    None
                }
            })
            .collect()
    }
}
