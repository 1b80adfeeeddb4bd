use anyhow::Result;
use clap::Parser;
use repo_profile::cli::Args;
use repo_profile::launch;
use tracing_subscriber::EnvFilter;

/// 初始化日志，RUST_LOG优先；日志写到stderr，stdout只保留画像JSON
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("repo_profile={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.into_config()?;

    init_tracing(config.verbose);

    launch(&config).await
}
