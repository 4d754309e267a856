//! Errors raised at the crate's decode and storage boundaries.
//!
//! Interaction-level problems (an id that vanished mid-gesture, closing an
//! empty modal stack) are never errors; the engine heals them silently.

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("storage error: {0}")]
    Storage(String),
}
