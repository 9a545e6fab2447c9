//! Error types for tasktracker
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (validation, unknown id, bad args)
//! - 3: Blocked by a dependent task
//! - 4: Operation failed (storage, I/O, terminal)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tt CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const DEPENDENCY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// A create or update was rejected before touching the collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("dependency '{0}' does not name an existing task")]
    UnknownDependency(String),

    #[error("a task cannot depend on itself")]
    SelfDependency,

    #[error("renaming to '{0}' would leave a dependent task depending on itself")]
    RenameCreatesSelfDependency(String),
}

/// Failure reading or writing a blob through a persistence gateway.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not decode '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage quota exceeded writing '{key}' ({size} bytes, limit {limit})")]
    QuotaExceeded { key: String, size: usize, limit: usize },
}

/// Failure of a task store operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task {0} not found")]
    NotFound(String),

    #[error("cannot delete '{report}': {} task(s) depend on it", dependents.len())]
    DependencyConflict {
        id: String,
        report: String,
        dependents: Vec<String>,
    },
}

/// Top-level error for the command line and terminal front-ends
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Could not read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal UI failed: {0:#}")]
    Ui(#[from] anyhow::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Store(StoreError::DependencyConflict { .. }) => exit_codes::DEPENDENCY_BLOCKED,

            Error::Store(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::ConfigRead { .. }
            | Error::TomlParse(_) => exit_codes::USER_ERROR,

            Error::Persistence(_) | Error::Io(_) | Error::Ui(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for front-end operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let blocked = Error::Store(StoreError::DependencyConflict {
            id: "1".into(),
            report: "R1".into(),
            dependents: vec!["2".into()],
        });
        assert_eq!(blocked.exit_code(), exit_codes::DEPENDENCY_BLOCKED);
        assert_eq!(
            Error::Store(StoreError::NotFound("9".into())).exit_code(),
            exit_codes::USER_ERROR
        );
        let quota = Error::Persistence(PersistenceError::QuotaExceeded {
            key: "tasks".into(),
            size: 10,
            limit: 1,
        });
        assert_eq!(quota.exit_code(), exit_codes::OPERATION_FAILED);
    }

    #[test]
    fn test_conflict_message_counts_dependents() {
        let err = StoreError::DependencyConflict {
            id: "1".into(),
            report: "R1".into(),
            dependents: vec!["2".into(), "3".into()],
        };
        assert_eq!(err.to_string(), "cannot delete 'R1': 2 task(s) depend on it");
    }
}
