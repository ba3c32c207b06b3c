use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    init_tracing();
    methali_cli::run(methali_cli::Cli::parse())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
