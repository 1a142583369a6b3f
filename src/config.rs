//! TOML configuration for the tracker, adapter, alert history and zones.
//!
//! ```toml
//! [tracker]
//! distance_threshold = 100.0
//! strategy = "greedy"
//!
//! [adapter]
//! min_score = 0.5
//! max_detections = 20
//!
//! [alerts]
//! capacity = 10
//!
//! [[zones]]
//! name = "loading dock"
//! kind = "restricted"
//! x = 0.0
//! y = 0.0
//! width = 320.0
//! height = 240.0
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::integration::AdapterConfig;
use crate::roi::{DEFAULT_ALERT_CAPACITY, RoiMonitor, ZoneKind};
use crate::tracker::{DEFAULT_DISTANCE_THRESHOLD, MatchStrategy, Rect, TrackerConfig};

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DetwatchConfigFile {
    tracker: Option<TrackerConfigFile>,
    adapter: Option<AdapterConfigFile>,
    alerts: Option<AlertsConfigFile>,
    zones: Option<Vec<ZoneConfigFile>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TrackerConfigFile {
    distance_threshold: Option<f32>,
    strategy: Option<MatchStrategy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct AdapterConfigFile {
    min_score: Option<f32>,
    max_detections: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct AlertsConfigFile {
    capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ZoneConfigFile {
    name: String,
    kind: ZoneKind,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSettings {
    pub name: String,
    pub kind: ZoneKind,
    pub rect: Rect,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct DetwatchConfig {
    pub tracker: TrackerConfig,
    pub adapter: AdapterConfig,
    pub alert_capacity: usize,
    pub zones: Vec<ZoneSettings>,
}

impl Default for DetwatchConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            adapter: AdapterConfig::default(),
            alert_capacity: DEFAULT_ALERT_CAPACITY,
            zones: Vec::new(),
        }
    }
}

impl DetwatchConfig {
    /// Load from the file named by `DETWATCH_CONFIG` (defaults when unset),
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let file_cfg = match std::env::var("DETWATCH_CONFIG").ok().as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => DetwatchConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let mut cfg = Self::from_file(read_config_file(path)?);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut cfg = Self::from_file(toml::from_str(raw)?);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: DetwatchConfigFile) -> Self {
        let tracker = TrackerConfig {
            distance_threshold: file
                .tracker
                .as_ref()
                .and_then(|t| t.distance_threshold)
                .unwrap_or(DEFAULT_DISTANCE_THRESHOLD),
            strategy: file
                .tracker
                .as_ref()
                .and_then(|t| t.strategy)
                .unwrap_or_default(),
        };
        let adapter = AdapterConfig {
            min_score: file
                .adapter
                .as_ref()
                .and_then(|a| a.min_score)
                .unwrap_or(0.0),
            max_detections: file.adapter.and_then(|a| a.max_detections),
        };
        let alert_capacity = file
            .alerts
            .and_then(|a| a.capacity)
            .unwrap_or(DEFAULT_ALERT_CAPACITY);
        let zones = file
            .zones
            .unwrap_or_default()
            .into_iter()
            .map(|z| ZoneSettings {
                name: z.name,
                kind: z.kind,
                rect: Rect::new(z.x, z.y, z.width, z.height),
                active: z.active.unwrap_or(true),
            })
            .collect();
        Self {
            tracker,
            adapter,
            alert_capacity,
            zones,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var("DETWATCH_DISTANCE_THRESHOLD") {
            self.tracker.distance_threshold = raw.trim().parse().map_err(|_| {
                Error::Config("DETWATCH_DISTANCE_THRESHOLD must be a number of pixels".into())
            })?;
        }
        if let Ok(raw) = std::env::var("DETWATCH_MATCH_STRATEGY") {
            self.tracker.strategy = match raw.trim().to_ascii_lowercase().as_str() {
                "greedy" => MatchStrategy::Greedy,
                "exclusive" => MatchStrategy::Exclusive,
                other => {
                    return Err(Error::Config(format!(
                        "DETWATCH_MATCH_STRATEGY must be greedy or exclusive, got {other:?}"
                    )));
                }
            };
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        let threshold = self.tracker.distance_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::Config(format!(
                "tracker.distance_threshold must be positive, got {threshold}"
            )));
        }
        if !(0.0..=1.0).contains(&self.adapter.min_score) {
            return Err(Error::Config(format!(
                "adapter.min_score must lie in [0, 1], got {}",
                self.adapter.min_score
            )));
        }
        if self.alert_capacity == 0 {
            return Err(Error::Config("alerts.capacity must be greater than zero".into()));
        }
        for zone in &mut self.zones {
            zone.name = zone.name.trim().to_string();
            if zone.name.is_empty() {
                return Err(Error::Config("zone names must not be empty".into()));
            }
            if !zone.rect.is_valid() {
                return Err(Error::Config(format!(
                    "zone {:?} has invalid geometry",
                    zone.name
                )));
            }
        }
        Ok(())
    }

    /// Monitor pre-populated with the configured zones.
    pub fn build_monitor(&self) -> Result<RoiMonitor> {
        let mut monitor = RoiMonitor::with_alert_capacity(self.alert_capacity);
        for zone in &self.zones {
            let id = monitor.add_zone(zone.name.clone(), zone.kind, zone.rect)?;
            monitor.set_active(id, zone.active)?;
        }
        Ok(monitor)
    }
}

fn read_config_file(path: &Path) -> Result<DetwatchConfigFile> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}
