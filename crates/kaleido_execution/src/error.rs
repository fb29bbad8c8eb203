//! Engine error taxonomy.

use std::path::{Path, PathBuf};

use kaleido_robotics::{RotationError, SlotId};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::controller::InitStep;
use crate::sequencer::PickStep;
use crate::traits::DeviceError;

/// Errors surfaced by the choreography engine.
///
/// Device faults are never retried: a pick-and-turn interrupted mid-way can
/// leave a tile in an unknown position, so the fault aborts the run and is
/// handed to the caller with the step that failed.
#[derive(Debug, Error)]
pub enum ChoreographyError {
    /// A device fault aborted a pick-and-turn
    #[error("pick-and-turn at {slot} aborted during {step}: {source}")]
    PickAndTurn {
        slot: SlotId,
        step: PickStep,
        #[source]
        source: DeviceError,
    },

    /// A device fault during initialization or homing
    #[error("initialization failed during {step}: {source}")]
    Init {
        step: InitStep,
        #[source]
        source: DeviceError,
    },

    /// Unsupported rotation amount in a plan or layout
    #[error(transparent)]
    InvalidRotationAmount(#[from] RotationError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid grid layout: {0}")]
    InvalidLayout(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `run` was called before `initialize`
    #[error("engine not initialized")]
    NotInitialized,
}

impl ChoreographyError {
    /// The underlying device fault, if this error came from hardware.
    pub fn device_error(&self) -> Option<&DeviceError> {
        match self {
            ChoreographyError::PickAndTurn { source, .. } => Some(source),
            ChoreographyError::Init { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Read and deserialize a JSON file.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ChoreographyError> {
    let text = std::fs::read_to_string(path).map_err(|source| ChoreographyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ChoreographyError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
