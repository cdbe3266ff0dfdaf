//! Error types for cmakegen-build.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for cmakegen-build operations.
pub type Result<T> = std::result::Result<T, GenError>;

/// Errors that can occur while turning a compilation database into CMake.
#[derive(Error, Diagnostic, Debug)]
pub enum GenError {
    /// Failed to read or write a file.
    #[error("I/O error on {}: {source}", .path.display())]
    #[diagnostic(code(cmakegen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compilation database is not valid JSON of the expected shape.
    #[error("Malformed compilation database: {0}")]
    #[diagnostic(
        code(cmakegen::input_format),
        help("expected a JSON array of {{\"directory\", \"file\", \"command\"}} objects")
    )]
    InputFormat(#[from] serde_json::Error),

    /// An entry is structurally valid JSON but unusable.
    #[error("Compilation database entry {index} ({}): {reason}", .file.display())]
    #[diagnostic(code(cmakegen::input_format))]
    InvalidEntry {
        index: usize,
        file: PathBuf,
        reason: String,
    },

    /// A command string could not be split into words.
    #[error("Cannot tokenize command for {}: {command}", .file.display())]
    #[diagnostic(code(cmakegen::parse), help("check for unbalanced quotes or a trailing backslash"))]
    Parse { file: PathBuf, command: String },

    /// Failed to parse the TOML generator configuration.
    #[error("Failed to parse TOML config: {0}")]
    #[diagnostic(code(cmakegen::config))]
    ParseToml(#[from] toml::de::Error),
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}
