//! Error types for configuration loading and manual autoplay input

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::ItemId;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Rejections at the manual override boundary. Invalid angles are never
/// partially accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManualInputError {
    #[error("Angle {angle}° is outside the swing range")]
    AngleOutOfRange { angle: f32 },

    #[error("Angle is not a finite number")]
    NonFiniteAngle,

    #[error("No targets given")]
    NoTargets,

    #[error("None of the requested items can be targeted: {0:?}")]
    NothingToTarget(Vec<ItemId>),
}
