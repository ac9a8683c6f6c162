#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("No data for {character} in any source")]
    NotFound { character: String },

    #[error("Expected a single kanji, got {input:?}")]
    InvalidCharacter { input: String },
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
