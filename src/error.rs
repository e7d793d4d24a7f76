use std::path::PathBuf;

use thiserror::Error;

use crate::generator::FormatError;
use crate::linter::LintIssue;

/// Errors surfaced by a generation run.
#[derive(Debug, Error)]
pub enum GenError {
    /// A template failed to render. The templates are fixed, so this points at a
    /// defect in the signature data handed to them rather than at user input.
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),

    /// The API description was rejected by the linter.
    #[error("invalid API description: {}", summarize(issues))]
    InvalidApi { issues: Vec<LintIssue> },

    /// The output location already holds the directory or one of the files.
    #[error("destination {0:?} already exists")]
    DestinationConflict(PathBuf),

    /// The assembled text is not valid Go source.
    #[error("generated {file} does not parse: {source}")]
    FormatValidation {
        file: &'static str,
        #[source]
        source: FormatError,
    },

    /// File system failure while writing output.
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `go mod init` / `go mod tidy` failed.
    #[error("`{command}` failed: {detail}")]
    Bootstrap { command: String, detail: String },
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

fn summarize(issues: &[LintIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.location, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}
