#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Engine creation failed: {0}")]
    EngineCreation(String),

    #[error("Unsupported result shape: {0}")]
    UnsupportedResult(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
