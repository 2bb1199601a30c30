// src/error.rs
//! Error types for patch assembly

use std::path::PathBuf;
use thiserror::Error;

/// Result type for patch assembly operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a patch assembly run
///
/// Every variant is fatal; nothing in the pipeline retries.
#[derive(Error, Debug)]
pub enum Error {
    /// Build metadata is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// A staged table dump the pipeline needs is not on disk
    #[error("missing table file: {}", path.display())]
    MissingTable { path: PathBuf },

    /// A table dump could not be parsed
    #[error("malformed table {table}: {reason}")]
    Format { table: String, reason: String },

    /// An external tool could not be run or exited non-zero
    #[error("external tool failed: `{command}`: {reason}")]
    ExternalTool { command: String, reason: String },

    /// IO error during staging
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an external tool error for a rendered command line
    pub fn tool(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExternalTool {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_names_command() {
        let err = Error::tool("msidb.exe -d a.pcp -e *", "exit status 1");
        let msg = err.to_string();
        assert!(msg.contains("msidb.exe -d a.pcp -e *"));
        assert!(msg.contains("exit status 1"));
    }

    #[test]
    fn test_missing_table_names_path() {
        let err = Error::MissingTable {
            path: PathBuf::from("/tmp/stage/TargetImages.idt"),
        };
        assert_eq!(
            err.to_string(),
            "missing table file: /tmp/stage/TargetImages.idt"
        );
    }
}
