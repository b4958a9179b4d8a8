use siprtt_common::config::Config;
use tracing::{error, info};

use crate::terminal::print;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    print::header("starting sip rtt monitor");

    let service = super::monitor_service(cfg).await?;
    info!(
        "Probing {} trunks every {}s (user checks {})",
        cfg.trunks.len(),
        cfg.interval.as_secs(),
        if service.source().discovery_enabled() { "on" } else { "off" }
    );

    service.run(cfg.interval, shutdown_signal()).await;

    print::end_of_program();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for Ctrl-C, running until killed: {e}");
        std::future::pending::<()>().await;
    }
}
