use clap::Parser;
use genapi::cli::{run_cli, Cli};
use genapi::logging::{init_logging_with_config, LogConfig};

fn main() {
    let cli = Cli::parse();
    let log_config = LogConfig::from_env().with_level(cli.log_level.as_deref());
    if let Err(e) = init_logging_with_config(&log_config) {
        eprintln!("WARNING: {e:#}");
    }

    if let Err(e) = run_cli(cli) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}
