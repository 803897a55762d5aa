//! Error types and handling for jestify
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for jestify operations
#[derive(Error, Diagnostic, Debug)]
pub enum JestifyError {
    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(jestify::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(jestify::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(jestify::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to delete file: {path}")]
    #[diagnostic(code(jestify::fs::delete_failed))]
    FileDeleteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(jestify::fs::io_error))]
    IoError { message: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(
        code(jestify::config::parse_failed),
        help("Check that the file contains valid JSON")
    )]
    ConfigParseFailed { path: String, reason: String },

    #[error("Malformed document: {message}")]
    #[diagnostic(
        code(jestify::config::malformed),
        help("A field on the edit path exists but is not a JSON object")
    )]
    MalformedDocument { message: String },

    // Workspace errors
    #[error("Not in a git repository")]
    #[diagnostic(
        code(jestify::workspace::not_in_git_repo),
        help(
            "Migration deletes files and rewrites configuration. Run it from a git \
             repository so the changes can be reverted, or pass --force to proceed anyway."
        )
    )]
    NotInGitRepository,

    // Install task errors
    #[error("npm install failed: {reason}")]
    #[diagnostic(
        code(jestify::install::failed),
        help("Run 'npm install' manually in the workspace to see the full output")
    )]
    InstallFailed { reason: String },
}

impl From<std::io::Error> for JestifyError {
    fn from(err: std::io::Error) -> Self {
        JestifyError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for JestifyError {
    fn from(err: serde_json::Error) -> Self {
        JestifyError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, JestifyError>;

// Convenience constructors

pub fn file_not_found(path: impl Into<String>) -> JestifyError {
    JestifyError::FileNotFound { path: path.into() }
}

pub fn file_read_failed(path: impl Into<String>, reason: impl Into<String>) -> JestifyError {
    JestifyError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn file_write_failed(path: impl Into<String>, reason: impl Into<String>) -> JestifyError {
    JestifyError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn config_parse_failed(path: impl Into<String>, reason: impl Into<String>) -> JestifyError {
    JestifyError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn malformed_document(message: impl Into<String>) -> JestifyError {
    JestifyError::MalformedDocument {
        message: message.into(),
    }
}
