use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Unified result type for the roster crate.
pub type Result<T> = std::result::Result<T, RosterError>;

/// Errors surfaced by allocation, storage and the registry.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("allocation request rejected: {}", join_messages(.0))]
    Rejected(Vec<ValidationError>),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("member `{0}` not found")]
    MemberNotFound(String),
    #[error("no {collection} entry at position {index} (have {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] figment::Error),
}

impl RosterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Rejected(errors) => errors,
            Self::Invalid(error) => std::slice::from_ref(error),
            _ => &[],
        }
    }
}

impl From<Vec<ValidationError>> for RosterError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Rejected(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
