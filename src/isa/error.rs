use std::path::PathBuf;

use thiserror::Error;

use super::diagnostic::Violation;

/// Represents any failure that can occur while locating, loading, merging, or validating
/// definition documents. Every variant is fatal: compilation stops at the first one.
#[derive(Debug, Error)]
pub enum DefError {
    #[error("invalid definition path '{}': {reason}", .path.display())]
    Path { path: PathBuf, reason: String },
    #[error("could not load '{document}': {reason}")]
    Load { document: String, reason: String },
    #[error("referential error: {0}")]
    Referential(Violation),
    #[error("bit budget error: {0}")]
    Budget(Violation),
    #[error("variant error: {0}")]
    Variant(Violation),
    #[error("subset error: {0}")]
    Subset(Violation),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DefError {
    pub fn path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DefError::Path {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn load(document: impl Into<String>, reason: impl Into<String>) -> Self {
        DefError::Load {
            document: document.into(),
            reason: reason.into(),
        }
    }

    /// Returns the rule violation carried by validation failures.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            DefError::Referential(violation)
            | DefError::Budget(violation)
            | DefError::Variant(violation)
            | DefError::Subset(violation) => Some(violation),
            DefError::Path { .. } | DefError::Load { .. } | DefError::Serialize(_) => None,
        }
    }
}
