//! Defines the on-disk scenario format.
//!
//! A scenario is serialized to and from RON or JSON, picked by file extension.

use crate::error::{IoError, Result};
use chrono::{DateTime, Utc};
use distmatch_core::{check_sequence, AnimSequence, CurveIssue, DistanceMatchingConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// The current version of the scenario file format.
pub const SCENARIO_FILE_VERSION: &str = "1.0.0";

/// Maximum allowed scenario file size (16 MB).
pub const MAX_SCENARIO_FILE_SIZE: u64 = 16 * 1024 * 1024;

fn default_true() -> bool {
    true
}

/// One recorded host tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveTick {
    /// Seconds since the previous tick
    pub delta_time: f32,
    /// Distance input written before the tick
    pub distance: f32,
    /// Runtime feature switch
    #[serde(default = "default_true")]
    pub feature_enabled: bool,
    /// Bind a different sequence before this tick
    #[serde(default)]
    pub switch_to: Option<String>,
    /// Re-run node initialization before this tick
    #[serde(default)]
    pub reinitialize: bool,
}

impl DriveTick {
    /// Enabled tick without asset changes
    pub fn new(delta_time: f32, distance: f32) -> Self {
        Self {
            delta_time,
            distance,
            feature_enabled: true,
            switch_to: None,
            reinitialize: false,
        }
    }
}

/// Top-level structure of a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// The version of the scenario file format.
    pub version: String,
    /// Display name
    pub name: String,
    /// Sequences available to the node
    pub sequences: Vec<AnimSequence>,
    /// Sequence bound at the start, by name
    #[serde(default)]
    pub sequence: Option<String>,
    /// Node settings
    #[serde(default)]
    pub node: DistanceMatchingConfig,
    /// Skeleton of the host; `None` accepts every sequence
    #[serde(default)]
    pub host_skeleton: Option<String>,
    /// Recorded inputs, in order
    #[serde(default)]
    pub ticks: Vec<DriveTick>,
    /// Timestamp of the last save
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Scenario {
    /// Creates an empty scenario stamped with the current format version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SCENARIO_FILE_VERSION.to_string(),
            name: name.into(),
            sequences: Vec::new(),
            sequence: None,
            node: DistanceMatchingConfig::default(),
            host_skeleton: None,
            ticks: Vec::new(),
            modified_at: None,
        }
    }

    /// Find a sequence by name
    pub fn find_sequence(&self, name: &str) -> Option<&AnimSequence> {
        self.sequences.iter().find(|s| s.name == name)
    }

    /// Run curve diagnostics on every sequence
    pub fn diagnostics(&self) -> Vec<(&str, Vec<CurveIssue>)> {
        self.sequences
            .iter()
            .map(|s| (s.name.as_str(), check_sequence(s, &self.node)))
            .collect()
    }

    /// Loads a scenario and checks its version.
    pub fn load(path: &Path) -> Result<Self> {
        let scenario = Self::load_with_limit(path, MAX_SCENARIO_FILE_SIZE)?;

        if scenario.version != SCENARIO_FILE_VERSION {
            return Err(IoError::VersionMismatch {
                expected: SCENARIO_FILE_VERSION.to_string(),
                found: scenario.version,
            });
        }

        tracing::debug!(
            "Loaded scenario '{}' ({} sequences, {} ticks) from {}",
            scenario.name,
            scenario.sequences.len(),
            scenario.ticks.len(),
            path.display()
        );
        Ok(scenario)
    }

    fn load_with_limit(path: &Path, limit: u64) -> Result<Self> {
        let size = std::fs::metadata(path)?.len();
        if size > limit {
            return Err(IoError::FileTooLarge { size, limit });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("ron");

        match extension {
            "json" => {
                let mut content = String::new();
                File::open(path)?.read_to_string(&mut content)?;
                Ok(serde_json::from_str(&content)?)
            }
            "ron" => {
                let mut content = String::new();
                File::open(path)?.read_to_string(&mut content)?;
                Ok(ron::from_str(&content)?)
            }
            _ => Err(IoError::UnsupportedFormat(extension.to_string())),
        }
    }

    /// Saves the scenario, updating `modified_at`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("ron");

        self.modified_at = Some(Utc::now());

        match extension {
            "json" => {
                let file = File::create(path)?;
                serde_json::to_writer_pretty(file, self)?;
            }
            "ron" => {
                let config = ron::ser::PrettyConfig::default();
                let s = ron::ser::to_string_pretty(self, config)?;
                let mut file = File::create(path)?;
                file.write_all(s.as_bytes())?;
            }
            _ => return Err(IoError::UnsupportedFormat(extension.to_string())),
        }

        Ok(())
    }
}
