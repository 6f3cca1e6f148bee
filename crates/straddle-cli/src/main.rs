/*
[INPUT]:  CLI arguments, YAML configuration file, STRADDLE_* environment
[OUTPUT]: Command results on stdout, logs on stderr
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use straddle_cli::{Cli, CliConfig, commands};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = CliConfig::load(args.config_path.as_deref())?
        .with_overrides(args.sandbox, args.account_id.clone());
    debug!(
        environment = ?config.environment,
        base_url = config.base_url.as_deref().unwrap_or("<environment default>"),
        max_retries = config.max_retries,
        "configuration loaded"
    );

    let rendered = commands::run(&args.command, &config, args.output).await?;
    println!("{rendered}");
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
