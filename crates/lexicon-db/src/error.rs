use lexicon_types::LocationError;
use thiserror::Error;

/// Everything that can abort a lexicon build. Queries never fail.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon source: {0}")]
    Io(#[from] std::io::Error),
    #[error("lexicon source is not well-formed: {0}")]
    SourceFormat(String),
    #[error("entry `{key}`: {source}")]
    Location {
        key: String,
        #[source]
        source: LocationError,
    },
    #[error("{kind} found outside of any entry (near byte {position})")]
    OrphanedContent { kind: &'static str, position: u64 },
}

impl LexiconError {
    pub(crate) fn source_format(msg: impl Into<String>) -> Self {
        LexiconError::SourceFormat(msg.into())
    }

    /// The underlying citation error, if this is one.
    pub fn location_error(&self) -> Option<&LocationError> {
        match self {
            LexiconError::Location { source, .. } => Some(source),
            _ => None,
        }
    }
}
