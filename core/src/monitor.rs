//! # Monitor Service
//!
//! Orchestrates one probe cycle:
//! 1. **Enumerate** the targets through the [`TargetSource`].
//! 2. **Probe** them through [`scanner::run_cycle`].
//! 3. **Push** the selected results to the [`MetricsSink`].
//!
//! [`MonitorService::run`] repeats this on a fixed cadence. A cycle always completes,
//! push included, before the next one may start.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use siprtt_common::config::Config;
use siprtt_common::metrics::CycleMetrics;
use siprtt_common::sink::{MetricsSink, RttPoint};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::discovery::TargetSource;
use crate::prober::Prober;
use crate::scanner;

/// Tag values stamped on every point.
#[derive(Debug, Clone)]
struct PointTemplate {
    measurement: String,
    host: String,
    source: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub written: usize,
    pub failed: usize,
}

pub struct MonitorService {
    source: TargetSource,
    prober: Arc<dyn Prober>,
    sink: Arc<dyn MetricsSink>,
    template: PointTemplate,
    max_concurrency: usize,
}

impl MonitorService {
    pub fn new(
        cfg: &Config,
        source: TargetSource,
        prober: Arc<dyn Prober>,
        sink: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            source,
            prober,
            sink,
            template: PointTemplate {
                measurement: cfg.influx.measurement.clone(),
                host: cfg.redis.host.clone(),
                source: cfg.influx.source_tag.clone(),
            },
            max_concurrency: cfg.probe.max_concurrency,
        }
    }

    pub fn source(&self) -> &TargetSource {
        &self.source
    }

    /// Enumerates and probes, without touching the sink.
    pub async fn collect(&self) -> CycleMetrics {
        let targets = self.source.enumerate().await;
        let total = targets.len();
        let start = Instant::now();

        let metrics =
            scanner::run_cycle(Arc::clone(&self.prober), targets, self.max_concurrency).await;

        info!(
            "Probed {} targets in {:.2}s, {} reachable",
            total,
            start.elapsed().as_secs_f64(),
            metrics.len()
        );
        metrics
    }

    /// Writes every result to the sink. A failed write is logged and does not stop the rest.
    pub async fn push(&self, metrics: &CycleMetrics) -> PushSummary {
        let mut summary = PushSummary::default();
        let timestamp_ns: i64 = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default();

        for (target, result) in metrics {
            let point = RttPoint {
                measurement: self.template.measurement.clone(),
                host: self.template.host.clone(),
                source: self.template.source.clone(),
                target: target.clone(),
                protocol: result.protocol.to_string(),
                rtt_ms: round_ms(result.rtt_ms),
                timestamp_ns,
            };

            match self.sink.write(&point).await {
                Ok(()) => {
                    summary.written += 1;
                    info!("Wrote RTT ({}) for {}: {} ms", point.protocol, target, point.rtt_ms);
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!("Failed to write RTT for {}: {}", target, e);
                }
            }
        }

        summary
    }

    /// One full cycle. An empty result map is not pushed.
    pub async fn run_once(&self) -> (CycleMetrics, PushSummary) {
        let metrics = self.collect().await;
        if metrics.is_empty() {
            warn!("No target answered this cycle, nothing to push");
            return (metrics, PushSummary::default());
        }

        let summary = self.push(&metrics).await;
        (metrics, summary)
    }

    /// Repeats [`Self::run_once`] every `interval` until `shutdown` resolves.
    ///
    /// Shutdown is only observed between cycles. Overrunning cycles delay the schedule.
    pub async fn run<F>(&self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping after the last completed cycle");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }
    }
}

fn round_ms(rtt_ms: f64) -> f64 {
    (rtt_ms * 100.0).round() / 100.0
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
