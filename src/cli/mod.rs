//! # CLI Module
//!
//! Command-line front end of the `genapi` binary.
//!
//! ## Commands
//!
//! ### `create`
//!
//! Create a project directory with a starter description:
//!
//! ```bash
//! genapi create shop
//! ```
//!
//! The name is lower-cased and must match `^[a-z][a-z0-9_-]*$`; the directory must
//! not exist. `shop/config.yaml` declares two sample endpoints.
//!
//! ### `init`
//!
//! Run inside a project made by `create`:
//!
//! ```bash
//! cd shop && genapi init
//! ```
//!
//! Writes `service.go` and `handler.go` next to `config.yaml`, runs
//! `go mod init <ImportPath>` and `go mod tidy`, then removes `config.yaml`.
//!
//! Options:
//! - `--config <FILE>` - description file (default: `config.yaml`)
//! - `--dir <DIR>` - project directory (default: `.`)
//! - `--keep-config` - do not delete the description afterwards
//! - `--skip-go-mod` - do not touch the Go toolchain
//! - `--formatter <auto|builtin|gofmt>` - validation pass
//!
//! ### `generate`
//!
//! Generate into a directory that does not exist yet:
//!
//! ```bash
//! genapi generate --config api.yaml --output ./shop
//! ```
//!
//! ### `lint`
//!
//! ```bash
//! genapi lint --config api.yaml --fail-on-error
//! ```
//!
//! ### `shell`
//!
//! Interactive session with `config`, `add`, `show`, `run`, `help` and `exit`.
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use clap::Parser;
//! use genapi::cli::{run_cli, Cli};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cli = Cli::parse();
//! run_cli(cli)?;
//! # Ok(())
//! # }
//! ```

mod commands;
mod shell;


pub use commands::{
    create_project, module_path, run_cli, validate_project_name, Cli, Commands, CONFIG_FILE,
};
pub use shell::Session;
