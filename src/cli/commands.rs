use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use askama::Template;
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use super::shell::Session;
use crate::bootstrap::init_go_module;
use crate::generator::naming::package_name;
use crate::generator::{ConfigYamlTemplate, FormatterChoice, GenerateOptions};
use crate::linter::{errors_only, lint_api, print_lint_issues, LintSeverity};
use crate::runtime_config::RuntimeConfig;
use crate::spec::{load_rest_api, RestApi};

/// Name of the description file `create` writes and `init` consumes.
pub const CONFIG_FILE: &str = "config.yaml";

#[allow(clippy::expect_used)]
static PROJECT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("valid project name regex"));

/// Command-line interface for genapi
#[derive(Parser, Debug)]
#[command(name = "genapi", version)]
#[command(about = "Scaffold Go REST services from an API description", long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available genapi commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a project directory holding a starter config.yaml
    Create {
        /// Project name: lower-case letters, digits, '-' and '_', starting with a letter
        project: String,
    },
    /// Generate service.go and handler.go inside an existing project
    ///
    /// Reads the description, writes both files into the directory, runs
    /// `go mod init` and `go mod tidy`, then deletes the description file.
    Init {
        /// API description; relative paths are resolved against --dir
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Keep the description file after a successful run
        #[arg(long, default_value_t = false)]
        keep_config: bool,

        /// Do not run `go mod init` / `go mod tidy`
        #[arg(long, default_value_t = false)]
        skip_go_mod: bool,

        /// Formatter used to validate the generated files
        #[arg(long, value_enum)]
        formatter: Option<FormatterChoice>,
    },
    /// Generate service.go and handler.go into a new directory
    Generate {
        /// API description (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory, which must not exist (default: ./<package name>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Formatter used to validate the generated files
        #[arg(long, value_enum)]
        formatter: Option<FormatterChoice>,
    },
    /// Lint an API description
    Lint {
        /// API description (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Exit with an error if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
    /// Build a description interactively and generate from it
    Shell,
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns an error if:
/// - The API description cannot be read or decoded
/// - Linting finds errors (`generate`, `init`, and `lint --fail-on-error`)
/// - The destination already exists
/// - Writing files or bootstrapping the Go module fails
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let runtime = RuntimeConfig::from_env();
    match cli.command {
        Commands::Create { project } => {
            let dir = create_project(Path::new("."), &project)?;
            println!("Created {}", dir.display());
            Ok(())
        }
        Commands::Init {
            config,
            dir,
            keep_config,
            skip_go_mod,
            formatter,
        } => {
            let config_path = if config.is_relative() {
                dir.join(&config)
            } else {
                config
            };
            let api = load_rest_api(&config_path)?;
            let options = GenerateOptions::in_place(&dir)
                .with_formatter(formatter.unwrap_or(runtime.formatter))
                .with_gofmt_bin(&runtime.gofmt_bin);
            let project = api.generate(&options)?;
            println!("Generated {}", project.service_path.display());
            println!("Generated {}", project.handler_path.display());

            if !skip_go_mod {
                init_go_module(&dir, &module_path(&api), &runtime.go_bin)?;
            }
            if !keep_config {
                if let Err(e) = fs::remove_file(&config_path) {
                    warn!(path = %config_path.display(), error = %e, "could not remove configuration file");
                }
            }
            Ok(())
        }
        Commands::Generate {
            config,
            output,
            formatter,
        } => {
            let api = load_rest_api(&config)?;
            let output = output.unwrap_or_else(|| PathBuf::from(package_name(&api.service_name)));
            let options = GenerateOptions::new(output)
                .with_formatter(formatter.unwrap_or(runtime.formatter))
                .with_gofmt_bin(&runtime.gofmt_bin);
            let project = api.generate(&options)?;
            println!("Generated {}", project.service_path.display());
            println!("Generated {}", project.handler_path.display());
            Ok(())
        }
        Commands::Lint {
            config,
            fail_on_error,
            errors_only: only_errors,
        } => {
            let api = load_rest_api(&config)?;
            let issues = lint_api(&api);
            let shown = if only_errors {
                errors_only(&issues)
            } else {
                issues
            };
            print_lint_issues(&shown);

            let errors = shown
                .iter()
                .filter(|i| i.severity == LintSeverity::Error)
                .count();
            if fail_on_error && errors > 0 {
                bail!("{errors} lint error(s) in {}", config.display());
            }
            Ok(())
        }
        Commands::Shell => {
            let stdin = io::stdin();
            let mut session = Session::new(stdin.lock(), io::stdout(), runtime);
            session.run()?;
            Ok(())
        }
    }
}

/// Check a project name as given to `create`, returning its lower-cased form.
///
/// # Errors
///
/// Fails when the lower-cased name does not match `^[a-z][a-z0-9_-]*$`.
pub fn validate_project_name(raw: &str) -> anyhow::Result<String> {
    let name = raw.trim().to_lowercase();
    if !PROJECT_NAME.is_match(&name) {
        bail!(
            "invalid project name {raw:?}: use lower-case letters, digits, '-' and '_', starting with a letter"
        );
    }
    Ok(name)
}

/// Create `<parent>/<project>` with a starter `config.yaml`.
///
/// # Errors
///
/// Fails on an invalid name, when the directory already exists, or on I/O errors.
pub fn create_project(parent: &Path, project: &str) -> anyhow::Result<PathBuf> {
    let name = validate_project_name(project)?;
    let dir = parent.join(&name);
    fs::create_dir(&dir).with_context(|| format!("unable to create project directory {dir:?}"))?;

    let mut config = ConfigYamlTemplate {
        project_name: &name,
        import_path: &name,
    }
    .render()
    .context("unable to render starter configuration")?;
    if !config.ends_with('\n') {
        config.push('\n');
    }
    let config_path = dir.join(CONFIG_FILE);
    fs::write(&config_path, config).with_context(|| format!("unable to write {config_path:?}"))?;
    info!(path = %config_path.display(), "wrote starter configuration");
    Ok(dir)
}

/// Module path for `go mod init`: `ImportPath` when set, else the package name.
pub fn module_path(api: &RestApi) -> String {
    api.import_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| package_name(&api.service_name))
}
