use anyhow::Context;
use campus::domain::config::ApiConfig;
use campus::kernel::config::load_config;
use campus_logger::Logger;
use campus_server::Server;

#[campus_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(Some("server")).context("Critical: Configuration is malformed")?;

    let log = &cfg.log;
    let logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level_name(&log.level)
        .json(log.json)
        .env_filter(log.filter.clone().unwrap_or_default());
    let _log = match &log.path {
        Some(path) => logger.path(path).init()?,
        None => logger.init()?,
    };

    Server::builder().config(cfg).build().await?.run().await
}
