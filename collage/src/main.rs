//! Collage builder.
//!
//! Classifies screenshots with `clip` and writes the composed collage as PNG.

mod cli;
mod config;
mod run;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Structured logging. Use `RUST_LOG=info` etc.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = cli::Args::parse();
    let config = config::Config::load_or_default(args.config.as_deref());
    if args.init_config {
        config.save(args.config.as_deref())?;
        tracing::info!("config written");
    }
    if args.files.is_empty() {
        return Ok(());
    }
    match run::run(&args, &config)? {
        Some(path) => tracing::info!(path = %path.display(), "collage written"),
        None => tracing::warn!("nothing to compose; no output written"),
    }
    Ok(())
}
