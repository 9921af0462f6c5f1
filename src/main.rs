use anyhow::Result;
use gittrail::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gittrail=info"));
    // Diagnostics go to stderr; stdout carries only the run summary.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.execute()
}
