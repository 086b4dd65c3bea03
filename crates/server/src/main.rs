use anyhow::Context;
use mundofit_server::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load().context("invalid configuration")?;
    mundofit_server::run(config).await?;

    Ok(())
}
