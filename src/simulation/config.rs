//! Scenario files: session config, starting policy and optional class labels.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulation::{
    ParameterTable, PolicyThresholds, ReservationSettings, SettingsError, SimulationConfig,
    Snapshot,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scenario JSON")]
    Json(#[from] serde_json::Error),
    #[error("invalid reservation settings")]
    Settings(#[from] SettingsError),
    #[error("expected {expected} class labels, found {found}")]
    LabelCount { expected: usize, found: usize },
    #[error("class label {0:?} appears more than once")]
    DuplicateLabel(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    pub config: SimulationConfig,
    pub settings: ReservationSettings,
    /// Generated class names, highest tier first.
    pub class_labels: Option<Vec<String>>,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Starting snapshot, relabelled when the scenario carries labels.
    pub fn baseline(&self) -> Result<Snapshot, ConfigError> {
        let table = ParameterTable::default();
        match &self.class_labels {
            Some(labels) => table.with_labels(labels),
            None => Ok(table.initial_conditions()),
        }
    }

    pub fn thresholds(&self) -> Result<PolicyThresholds, ConfigError> {
        Ok(PolicyThresholds::from_baseline(&self.baseline()?))
    }

    /// Baseline plus settings checked against it; what a session needs to start.
    pub fn prepare(&self) -> Result<(Snapshot, ReservationSettings), ConfigError> {
        let baseline = self.baseline()?;
        self.settings.validate_for(&baseline)?;
        Ok((baseline, self.settings.clone()))
    }
}
