use thiserror::Error;

/// Errors raised at the engine's edges: content parsing and collaborator I/O.
///
/// The progression core never returns these. Inside a session they are
/// logged and swallowed so the learner can keep going.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("resume store unavailable: {0}")]
    Store(String),

    #[error("progress sink rejected completion record: {0}")]
    Sink(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
