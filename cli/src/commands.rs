pub mod once;
pub mod run;
pub mod targets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use siprtt_common::config::{Config, DEFAULT_CONFIG_PATH};
use siprtt_common::store::LocationStore;
use siprtt_core::discovery::TargetSource;
use siprtt_core::influx::InfluxSink;
use siprtt_core::location::RedisLocationStore;
use siprtt_core::monitor::MonitorService;
use siprtt_core::prober::SipProber;

const SINK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "siprtt", version)]
#[command(about = "Measures SIP round-trip times to trunks and registered contacts.")]
pub struct CommandLine {
    /// Path to the INI configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    /// Probe on a fixed cadence until interrupted (default)
    #[command(alias = "r")]
    Run,
    /// Run a single cycle and print the results
    #[command(alias = "o")]
    Once {
        /// Do not push results to InfluxDB
        #[arg(long)]
        dry_run: bool,
    },
    /// List the targets the next cycle would probe
    #[command(alias = "t")]
    Targets,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Connects the location store when user checks are enabled.
async fn connect_store(cfg: &Config) -> anyhow::Result<Option<Arc<dyn LocationStore>>> {
    if !cfg.check_users {
        return Ok(None);
    }

    let store = RedisLocationStore::connect(&cfg.redis)
        .await
        .with_context(|| format!("connecting to Redis at {}:{}", cfg.redis.host, cfg.redis.port))?;
    Ok(Some(Arc::new(store)))
}

async fn target_source(cfg: &Config) -> anyhow::Result<TargetSource> {
    let store = connect_store(cfg).await?;
    Ok(TargetSource::new(cfg, store))
}

async fn monitor_service(cfg: &Config) -> anyhow::Result<MonitorService> {
    let source = target_source(cfg).await?;
    let prober = Arc::new(SipProber::new(&cfg.probe));
    let sink = Arc::new(
        InfluxSink::new(&cfg.influx, SINK_TIMEOUT).context("setting up the InfluxDB client")?,
    );

    Ok(MonitorService::new(cfg, source, prober, sink))
}
