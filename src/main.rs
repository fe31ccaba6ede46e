use std::fs;
use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use search_tree_viz::{
    cli::Cli,
    config::{Config, LogFormat},
    pipeline::{run_file, RunOptions},
    render::DotExporter,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    cli.apply(&mut config);

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        input = %cli.json_file.display(),
        "Search tree visualizer starting..."
    );

    fs::create_dir_all(&config.output.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output.output_dir.display()
        )
    })?;

    let options = RunOptions::from(&config);
    let mut exporter = DotExporter::new(config.render.clone());
    let stdout = io::stdout();
    let mut progress = stdout.lock();

    match run_file(&cli.json_file, &options, &mut exporter, &mut progress) {
        Ok(summary) => {
            info!(
                exported = summary.exported(),
                skipped = summary.skipped(),
                failed = summary.failed(),
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run aborted");
            Err(e.into())
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}
