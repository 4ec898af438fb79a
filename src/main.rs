mod cli;

use crate::cli::Cli;
use clap::Parser;
use extrepo_config::Config;
use extrepo_index::Mode;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())))
        .init();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err:?}");
            return ExitCode::FAILURE;
        },
    };
    cli.apply(&mut config);

    match extrepo_index::build(&config, cli.fallback) {
        Ok(report) => {
            let count = report.index.len();
            match report.mode {
                Mode::Badging => tracing::info!(index = %report.index_file.display(), "Created repository with {count} extensions"),
                Mode::Fallback => {
                    tracing::info!(index = %report.index_file.display(), "Created simple repository with {count} extensions")
                },
            }
            if !report.skipped.is_empty() {
                tracing::info!(skipped = report.skipped.len(), "Some APKs were left out of the manifest");
            }
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}
