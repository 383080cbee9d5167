/// Errors raised while building conversion options.
///
/// Conversion itself never fails: ambiguous markup falls back to literal
/// text and excess nesting is truncated. Only the configuration surface
/// can reject input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An extension name that does not map to any known flag.
    #[error("unknown extension: {0}")]
    UnknownExtension(String),
    /// Malformed options document.
    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
