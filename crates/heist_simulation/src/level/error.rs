//! Level loading / transition errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    /// Exit reached but the level names no next level.
    #[error("level `{level}` has no next level configured for its exit")]
    NextLevelNotConfigured { level: String },

    #[error("invalid level config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse level config: {0}")]
    Parse(#[from] serde_json::Error),
}
