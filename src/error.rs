//! Error types

/// Failures that stop the game (everything else degrades with a warning)
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Asset loading failed: {0}")]
    AssetLoad(String),

    #[error("Replay limit of {limit} reached, reload the page to play again")]
    ReplayLimitExceeded { limit: u32 },

    #[error("Invalid tuning: {0}")]
    InvalidConfig(String),
}
