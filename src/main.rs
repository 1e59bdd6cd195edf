use anyhow::Context;
use fitrankd::config::Config;
use fitrankd::ipc;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    // stdout carries protocol lines; logs go to stderr.
    let filter = match config.log_filter.as_deref() {
        Some(f) => EnvFilter::try_new(f).context("invalid FITRANK_LOG filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("failed to load configuration")?;
    init_tracing(&config)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        max_batch_items = config.max_batch_items,
        "fitrankd starting"
    );

    let mut state = ipc::AppState::new(config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    ipc::serve(&mut state, stdin.lock(), stdout.lock()).context("stdio loop failed")?;

    tracing::info!("input closed, exiting");
    Ok(())
}
