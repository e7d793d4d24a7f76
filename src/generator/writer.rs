use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::GenError;
use crate::linter::{lint_api, reject_errors, LintSeverity};
use crate::spec::RestApi;

use super::format::{FormatterChoice, SourceFormatter};
use super::handler::{synthesize_handler, HANDLER_FILE};
use super::naming::package_name;
use super::service::{synthesize_service, SERVICE_FILE};

const STAGING_PREFIX: &str = ".genapi-";

/// How generated files land on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Create the output directory; it must not exist yet.
    #[default]
    NewDirectory,
    /// Write into an existing directory that holds neither generated file.
    InPlace,
}

/// Options for [`RestApi::generate`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output_dir: PathBuf,
    pub mode: WriteMode,
    pub formatter: FormatterChoice,
    /// Binary used for the external `gofmt` pass.
    pub gofmt_bin: PathBuf,
}

impl GenerateOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        GenerateOptions {
            output_dir: output_dir.into(),
            mode: WriteMode::NewDirectory,
            formatter: FormatterChoice::default(),
            gofmt_bin: PathBuf::from("gofmt"),
        }
    }

    pub fn in_place(output_dir: impl Into<PathBuf>) -> Self {
        GenerateOptions {
            mode: WriteMode::InPlace,
            ..GenerateOptions::new(output_dir)
        }
    }

    pub fn with_formatter(mut self, formatter: FormatterChoice) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_gofmt_bin(mut self, gofmt_bin: impl Into<PathBuf>) -> Self {
        self.gofmt_bin = gofmt_bin.into();
        self
    }
}

/// Both generated files, formatted, before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSources {
    pub service: String,
    pub handler: String,
}

/// Where a successful generation put its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProject {
    pub dir: PathBuf,
    pub service_path: PathBuf,
    pub handler_path: PathBuf,
}

impl GeneratedProject {
    fn at(dir: &Path) -> Self {
        GeneratedProject {
            dir: dir.to_path_buf(),
            service_path: dir.join(SERVICE_FILE),
            handler_path: dir.join(HANDLER_FILE),
        }
    }
}

impl RestApi {
    /// Render `service.go` and `handler.go` in memory.
    ///
    /// A description the linter rejects fails with [`GenError::InvalidApi`]
    /// before anything is rendered, so empty or invalid names never reach the
    /// templates.
    pub fn render(&self, formatter: &dyn SourceFormatter) -> Result<RenderedSources, GenError> {
        let package = package_name(&self.service_name);
        let service = synthesize_service(&package, &self.service_name, &self.endpoints, formatter)?;
        let handler = synthesize_handler(&package, &self.service_name, &self.endpoints, formatter)?;
        Ok(RenderedSources { service, handler })
    }

    /// Lint, render and write both files.
    ///
    /// Output is all-or-nothing: either both files exist and are formatted, or
    /// neither was written.
    ///
    /// # Errors
    ///
    /// - [`GenError::InvalidApi`] when the linter reports errors
    /// - [`GenError::DestinationConflict`] when the target directory (new-directory
    ///   mode) or one of the files (in-place mode) already exists
    /// - [`GenError::FormatValidation`] / [`GenError::Template`] from rendering
    /// - [`GenError::Io`] on file system failures
    pub fn generate(&self, options: &GenerateOptions) -> Result<GeneratedProject, GenError> {
        let issues = lint_api(self);
        for issue in issues.iter().filter(|i| i.severity != LintSeverity::Error) {
            warn!(location = %issue.location, kind = %issue.kind, "{}", issue.message);
        }
        reject_errors(&issues)?;

        let dir = options.output_dir.as_path();
        check_destination(dir, options.mode)?;

        let formatter = options.formatter.build(&options.gofmt_bin);
        let sources = self.render(formatter.as_ref())?;

        let project = match options.mode {
            WriteMode::NewDirectory => write_new_directory(dir, &sources)?,
            WriteMode::InPlace => write_in_place(dir, &sources)?,
        };
        info!(path = %project.service_path.display(), "wrote service");
        info!(path = %project.handler_path.display(), "wrote handler");
        Ok(project)
    }
}

/// True when anything, a dangling symlink included, sits at `path`.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn check_destination(dir: &Path, mode: WriteMode) -> Result<(), GenError> {
    match mode {
        WriteMode::NewDirectory => {
            if occupied(dir) {
                return Err(GenError::DestinationConflict(dir.to_path_buf()));
            }
        }
        WriteMode::InPlace => {
            if !dir.is_dir() {
                return Err(GenError::io(
                    dir,
                    io::Error::new(io::ErrorKind::NotFound, "output directory does not exist"),
                ));
            }
            for name in [SERVICE_FILE, HANDLER_FILE] {
                let path = dir.join(name);
                if occupied(&path) {
                    return Err(GenError::DestinationConflict(path));
                }
            }
        }
    }
    Ok(())
}

/// Stage both files in a hidden sibling directory, then rename it into place.
fn write_new_directory(dir: &Path, sources: &RenderedSources) -> Result<GeneratedProject, GenError> {
    let parent = match dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| GenError::io(&parent, e))?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(&parent)
        .map_err(|e| GenError::io(&parent, e))?;
    for (name, contents) in [(SERVICE_FILE, &sources.service), (HANDLER_FILE, &sources.handler)] {
        let path = staging.path().join(name);
        fs::write(&path, contents).map_err(|e| GenError::io(&path, e))?;
    }
    set_mode(staging.path(), 0o755)?;

    // The staging directory is still cleaned up on drop if the rename fails.
    fs::rename(staging.path(), dir).map_err(|e| {
        if occupied(dir) {
            GenError::DestinationConflict(dir.to_path_buf())
        } else {
            GenError::io(dir, e)
        }
    })?;
    let _ = staging.keep();
    Ok(GeneratedProject::at(dir))
}

/// Persist each file from a temp file without clobbering; undo the first file if
/// the second cannot be placed.
fn write_in_place(dir: &Path, sources: &RenderedSources) -> Result<GeneratedProject, GenError> {
    let project = GeneratedProject::at(dir);
    let service = stage_file(dir, &sources.service)?;
    let handler = stage_file(dir, &sources.handler)?;

    persist(service, &project.service_path)?;
    if let Err(e) = persist(handler, &project.handler_path) {
        if let Err(cleanup) = fs::remove_file(&project.service_path) {
            warn!(path = %project.service_path.display(), error = %cleanup, "failed to roll back service file");
        }
        return Err(e);
    }
    Ok(project)
}

fn stage_file(dir: &Path, contents: &str) -> Result<tempfile::NamedTempFile, GenError> {
    let mut file = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".go.tmp")
        .tempfile_in(dir)
        .map_err(|e| GenError::io(dir, e))?;
    let path = file.path().to_path_buf();
    file.write_all(contents.as_bytes())
        .map_err(|e| GenError::io(&path, e))?;
    file.flush().map_err(|e| GenError::io(&path, e))?;
    set_mode(&path, 0o644)?;
    Ok(file)
}

fn persist(file: tempfile::NamedTempFile, target: &Path) -> Result<(), GenError> {
    file.persist_noclobber(target).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            GenError::DestinationConflict(target.to_path_buf())
        } else {
            GenError::io(target, e.error)
        }
    })?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), GenError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| GenError::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), GenError> {
    Ok(())
}
