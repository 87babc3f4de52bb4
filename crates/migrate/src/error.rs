/// Errors raised while assembling ordered value sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A source with the same name is already registered.
    #[error("duplicate value source: {name}")]
    DuplicateSource { name: String },

    /// `add_before` referenced a source that is not registered.
    #[error("value source not found: {name}")]
    UnknownSource { name: String },

    /// The value-source document is not valid JSON or has the wrong shape.
    #[error("invalid value sources: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}
