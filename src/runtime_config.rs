//! # Runtime Configuration Module
//!
//! Environment variables that change how `genapi` talks to the Go toolchain.
//!
//! ## Environment Variables
//!
//! ### `GENAPI_FORMATTER`
//!
//! Which formatter validates generated files: `auto`, `builtin` or `gofmt`.
//! `auto` runs the built-in pass and then `gofmt` if it can be started.
//!
//! Default: `auto`
//!
//! ### `GENAPI_GOFMT_BIN`
//!
//! Path or name of the `gofmt` executable. Default: `gofmt`
//!
//! ### `GENAPI_GO_BIN`
//!
//! Path or name of the `go` executable used by `genapi init` for
//! `go mod init` / `go mod tidy`. Default: `go`
//!
//! ## Usage
//!
//! ```rust
//! use genapi::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("formatter: {:?}", config.formatter);
//! ```
//!
//! Command-line flags take precedence over these values.

use std::env;
use std::path::PathBuf;

use crate::generator::FormatterChoice;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Formatter used when no `--formatter` flag is given
    pub formatter: FormatterChoice,
    /// `gofmt` executable
    pub gofmt_bin: PathBuf,
    /// `go` executable
    pub go_bin: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            formatter: FormatterChoice::Auto,
            gofmt_bin: PathBuf::from("gofmt"),
            go_bin: PathBuf::from("go"),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = RuntimeConfig::default();
        RuntimeConfig {
            formatter: get("GENAPI_FORMATTER")
                .map(|v| FormatterChoice::parse(&v))
                .unwrap_or(defaults.formatter),
            gofmt_bin: get("GENAPI_GOFMT_BIN").map(PathBuf::from).unwrap_or(defaults.gofmt_bin),
            go_bin: get("GENAPI_GO_BIN").map(PathBuf::from).unwrap_or(defaults.go_bin),
        }
    }
}
