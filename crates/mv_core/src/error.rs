use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed snapshot payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    SchemaVersion { found: u32, expected: u32 },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Unknown match status: {0}")]
    UnknownStatus(String),
}

impl EngineError {
    /// Whether the caller can keep feeding the engine after this error.
    /// Every inbound anomaly is recoverable; the engine never poisons
    /// its retained state on a rejected payload.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EngineError::MalformedPayload(_) => true,
            EngineError::SchemaVersion { .. } => true,
            EngineError::InvalidSnapshot(_) => true,
            EngineError::UnknownStatus(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
