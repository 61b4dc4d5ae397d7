use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use telemetry::TelemetryConfig;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BenchConfig {
    pub bench: BenchSettings,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BenchSettings {
    /// Back-to-back `now()` pairs recorded for the overhead histogram.
    pub iterations: usize,
    pub busy_wait_ms: u64,
    pub trials: usize,
    /// Accepted relative error of a busy-wait measurement.
    pub tolerance: f64,
    pub sleep_ms: u64,
    pub pin_core: bool,
    pub report_path: Option<PathBuf>,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            iterations: 1_000_000,
            busy_wait_ms: 5,
            trials: 100,
            tolerance: 0.2,
            sleep_ms: 50,
            pin_core: true,
            report_path: None,
        }
    }
}

/// Loads `path`, falling back to defaults when the file does not exist.
pub fn load(path: &Path) -> Result<BenchConfig, anyhow::Error> {
    if !path.exists() {
        return Ok(BenchConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: BenchConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    anyhow::ensure!(config.bench.trials > 0, "bench.trials must be positive");
    anyhow::ensure!(config.bench.iterations > 0, "bench.iterations must be positive");

    Ok(config)
}
