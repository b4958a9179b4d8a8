use colored::*;
use siprtt_common::config::Config;
use tracing::info;

use crate::terminal::print;

pub async fn once(cfg: &Config, dry_run: bool) -> anyhow::Result<()> {
    print::header("single probe cycle");

    let service = super::monitor_service(cfg).await?;
    let metrics = service.collect().await;

    if metrics.is_empty() {
        print::header("no target answered");
        return Ok(());
    }

    print::header("round-trip times");
    print::results(&metrics);

    if dry_run {
        print::print_status("Dry run, nothing written to InfluxDB");
        return Ok(());
    }

    let summary = service.push(&metrics).await;
    let written = format!("{} written", summary.written).bold().green();
    let failed = format!("{} failed", summary.failed).bold().red();
    info!("Push complete: {written}, {failed}");
    Ok(())
}
