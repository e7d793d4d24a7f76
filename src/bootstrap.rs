//! Go module bootstrap for a freshly generated project.
//!
//! After `genapi init` writes the two source files, the directory still needs a
//! `go.mod` that pulls in gorilla/mux. That is `go mod init <path>` followed by
//! `go mod tidy`, run in the project directory.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::GenError;

/// Run `go mod init <import_path>` then `go mod tidy` inside `dir`.
///
/// `go_bin` is the `go` executable; tests point it at a stub script.
///
/// # Errors
///
/// [`GenError::Bootstrap`] when either command cannot be started or exits
/// unsuccessfully. `go mod tidy` is not attempted if `go mod init` failed.
pub fn init_go_module(dir: &Path, import_path: &str, go_bin: &Path) -> Result<(), GenError> {
    run_go(dir, go_bin, &["mod", "init", import_path])?;
    run_go(dir, go_bin, &["mod", "tidy"])?;
    Ok(())
}

fn run_go(dir: &Path, go_bin: &Path, args: &[&str]) -> Result<(), GenError> {
    let command = format!("{} {}", go_bin.display(), args.join(" "));
    info!(dir = %dir.display(), %command, "running");

    let output = Command::new(go_bin)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| GenError::Bootstrap {
            command: command.clone(),
            detail: e.to_string(),
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GenError::Bootstrap {
            command,
            detail: if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            },
        });
    }
    Ok(())
}
