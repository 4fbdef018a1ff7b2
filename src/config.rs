//! Pipeline configuration.
//!
//! Every knob of the post-processing chain lives here: the per-class score
//! table, the two flat cutoffs applied after it, the reference tracker's
//! settings and the operating mode. The default matches the ten-class
//! nuScenes deployment.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tracker::{ClassGate, TrackerConfig};

/// What a processed frame publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Identity-persistent tracks; box values carry track ids.
    #[default]
    Tracking,
    /// Per-frame detections; box values carry confidence scores.
    Detection,
}

/// One entry of the class table. The class id is the entry's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    pub name: String,
    /// Minimum score (inclusive) for a detection of this class to survive.
    pub score_threshold: f32,
    /// Association gate for the reference tracker, in meters. Classes without
    /// one are not tracked.
    #[serde(default)]
    pub max_center_distance: Option<f32>,
}

impl ClassConfig {
    pub fn new(name: &str, score_threshold: f32, max_center_distance: Option<f32>) -> Self {
        Self {
            name: name.to_string(),
            score_threshold,
            max_center_distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub classes: Vec<ClassConfig>,
    /// Flat cutoff (exclusive) for admitting detections into the tracker.
    pub tracking_threshold: f32,
    /// Flat cutoff (inclusive) for publishing detections in detection mode.
    pub detection_threshold: f32,
    pub mode: OperatingMode,
    pub tracker: TrackerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classes: vec![
                ClassConfig::new("car", 0.4, Some(4.0)),
                ClassConfig::new("truck", 0.4, Some(4.0)),
                ClassConfig::new("construction_vehicle", 0.4, None),
                ClassConfig::new("bus", 0.3, Some(5.5)),
                ClassConfig::new("trailer", 0.4, Some(3.0)),
                ClassConfig::new("barrier", 0.4, None),
                ClassConfig::new("motorcycle", 0.15, Some(13.0)),
                ClassConfig::new("bicycle", 0.15, Some(3.0)),
                ClassConfig::new("pedestrian", 0.1, Some(1.0)),
                ClassConfig::new("traffic_cone", 0.1, None),
            ],
            tracking_threshold: 0.65,
            detection_threshold: 0.5,
            mode: OperatingMode::Tracking,
            tracker: TrackerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load and validate a JSON config file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.classes.is_empty() {
            return Err(ConfigError::Invalid("class table is empty".into()));
        }

        let mut names = HashSet::new();
        for class in &self.classes {
            if !names.insert(class.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate class name `{}`",
                    class.name
                )));
            }
            check_unit_interval(&format!("{} score_threshold", class.name), class.score_threshold)?;
            if let Some(gate) = class.max_center_distance {
                if !(gate.is_finite() && gate > 0.0) {
                    return Err(ConfigError::Invalid(format!(
                        "{} max_center_distance must be positive, got {gate}",
                        class.name
                    )));
                }
            }
        }

        check_unit_interval("tracking_threshold", self.tracking_threshold)?;
        check_unit_interval("detection_threshold", self.detection_threshold)?;

        if self.tracker.max_age == 0 {
            return Err(ConfigError::Invalid("tracker.max_age must be at least 1".into()));
        }
        Ok(())
    }

    /// Class id → minimum score.
    pub fn class_thresholds(&self) -> BTreeMap<u32, f32> {
        self.classes
            .iter()
            .enumerate()
            .map(|(id, class)| (id as u32, class.score_threshold))
            .collect()
    }

    /// Class names indexed by class id.
    pub fn class_names(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.name.clone()).collect()
    }

    /// Association gates for the classes the reference tracker follows.
    pub fn tracker_gates(&self) -> Vec<ClassGate> {
        self.classes
            .iter()
            .enumerate()
            .filter_map(|(id, class)| {
                class.max_center_distance.map(|max_distance| ClassGate {
                    label: id as u32,
                    name: class.name.clone(),
                    max_distance,
                })
            })
            .collect()
    }
}

fn check_unit_interval(what: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{what} must be within [0, 1], got {value}"
        )))
    }
}
