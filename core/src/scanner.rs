//! Probe cycle execution and result selection.
//!
//! Every `(target, transport)` pair is an independent task on a bounded pool. All tasks
//! are joined before any selection happens, so selection only ever reads finished
//! attempts. The per-attempt socket deadline is the only cancellation.

use std::sync::Arc;

use siprtt_common::metrics::{CycleMetrics, ProbeAttempt, ProbeResult};
use siprtt_common::network::target::Target;
use siprtt_common::network::transport::Transport;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::prober::Prober;

/// Picks the reported attempt among `attempts`, evaluated in order.
///
/// The successful attempt with the strictly larger RTT wins, so on a tie the
/// earlier attempt is kept. `None` when no attempt succeeded.
pub fn select(attempts: &[ProbeAttempt]) -> Option<(Transport, f64)> {
    let mut chosen: Option<(Transport, f64)> = None;

    for attempt in attempts {
        let Some(rtt_ms) = attempt.outcome.rtt_ms() else {
            continue;
        };
        if chosen.is_none_or(|(_, best)| rtt_ms > best) {
            chosen = Some((attempt.transport, rtt_ms));
        }
    }

    chosen
}

/// Probes every target over both transports and builds the cycle's result map.
///
/// At most `max_concurrency` attempts are in flight. Targets sharing a name overwrite
/// each other in enumeration order.
pub async fn run_cycle(
    prober: Arc<dyn Prober>,
    targets: Vec<Target>,
    max_concurrency: usize,
) -> CycleMetrics {
    let targets: Arc<[Target]> = targets.into();
    let permits: usize = max_concurrency.clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(permits));
    let mut tasks: JoinSet<(usize, ProbeAttempt)> = JoinSet::new();

    for idx in 0..targets.len() {
        for transport in Transport::PROBE_ORDER {
            let prober = Arc::clone(&prober);
            let targets = Arc::clone(&targets);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                // The semaphore is never closed; the permit lives until the attempt ends.
                let _permit = semaphore.acquire_owned().await;
                let target = &targets[idx];
                let outcome = prober.probe(target, transport).await;
                let attempt = ProbeAttempt {
                    target_name: target.name.clone(),
                    transport,
                    outcome,
                };
                (idx, attempt)
            });
        }
    }

    let mut attempts: Vec<Vec<ProbeAttempt>> =
        (0..targets.len()).map(|_| Vec::new()).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, attempt)) => attempts[idx].push(attempt),
            Err(e) => error!("Probe task aborted: {e}"),
        }
    }

    let mut metrics = CycleMetrics::new();
    for (target, mut target_attempts) in targets.iter().zip(attempts) {
        target_attempts.sort_by_key(|a| a.transport);

        match select(&target_attempts) {
            Some((protocol, rtt_ms)) => {
                debug!("{} selected {} at {:.2} ms", target, protocol, rtt_ms);
                metrics.insert(
                    target.name.clone(),
                    ProbeResult {
                        target_name: target.name.clone(),
                        protocol,
                        rtt_ms,
                    },
                );
            }
            None => debug!("{} unreachable over every transport", target),
        }
    }

    metrics
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use siprtt_common::error::ProbeError;
    use siprtt_common::metrics::ProbeOutcome;

    fn ok(transport: Transport, rtt_ms: f64) -> ProbeAttempt {
        ProbeAttempt {
            target_name: "trunk".into(),
            transport,
            outcome: ProbeOutcome::Success { rtt_ms },
        }
    }

    fn failed(transport: Transport) -> ProbeAttempt {
        ProbeAttempt {
            target_name: "trunk".into(),
            transport,
            outcome: ProbeOutcome::Failure {
                reason: ProbeError::Timeout(Duration::from_secs(2)),
            },
        }
    }

    /// Answers from a fixed table keyed by `(target name, transport)`.
    struct ScriptedProber {
        script: HashMap<(String, Transport), Option<f64>>,
        calls: AtomicUsize,
    }

    impl ScriptedProber {
        fn new(entries: &[(&str, Transport, Option<f64>)]) -> Self {
            Self {
                script: entries
                    .iter()
                    .map(|(name, t, rtt)| ((name.to_string(), *t), *rtt))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, target: &Target, transport: Transport) -> ProbeOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.get(&(target.name.clone(), transport)).copied().flatten() {
                Some(rtt_ms) => ProbeOutcome::Success { rtt_ms },
                None => ProbeOutcome::Failure {
                    reason: ProbeError::Timeout(Duration::from_secs(2)),
                },
            }
        }
    }

    fn trunk(name: &str, last: u8) -> Target {
        Target::trunk(name, Ipv4Addr::new(10, 65, 0, last), 5060)
    }

    #[test]
    fn select_prefers_strictly_larger_rtt() {
        let attempts = [ok(Transport::Tcp, 12.0), ok(Transport::Udp, 9.0)];
        assert_eq!(select(&attempts), Some((Transport::Tcp, 12.0)));

        let attempts = [ok(Transport::Tcp, 3.0), ok(Transport::Udp, 7.5)];
        assert_eq!(select(&attempts), Some((Transport::Udp, 7.5)));
    }

    #[test]
    fn select_keeps_first_transport_on_tie() {
        let attempts = [ok(Transport::Tcp, 5.0), ok(Transport::Udp, 5.0)];
        assert_eq!(select(&attempts), Some((Transport::Tcp, 5.0)));
    }

    #[test]
    fn select_single_success_is_returned_verbatim() {
        assert_eq!(
            select(&[failed(Transport::Tcp), ok(Transport::Udp, 30.0)]),
            Some((Transport::Udp, 30.0))
        );
        assert_eq!(
            select(&[ok(Transport::Tcp, 0.0), failed(Transport::Udp)]),
            Some((Transport::Tcp, 0.0))
        );
    }

    #[test]
    fn select_nothing_when_all_failed() {
        assert_eq!(select(&[failed(Transport::Tcp), failed(Transport::Udp)]), None);
        assert_eq!(select(&[]), None);
    }

    #[tokio::test]
    async fn cycle_matches_three_trunk_scenario() {
        let prober = Arc::new(ScriptedProber::new(&[
            ("A", Transport::Tcp, Some(12.0)),
            ("A", Transport::Udp, Some(9.0)),
            ("B", Transport::Tcp, None),
            ("B", Transport::Udp, None),
            ("C", Transport::Tcp, None),
            ("C", Transport::Udp, Some(30.0)),
        ]));

        let targets = vec![trunk("A", 1), trunk("B", 2), trunk("C", 3)];
        let metrics = run_cycle(prober.clone(), targets, 2).await;

        assert_eq!(metrics.len(), 2);
        assert_eq!(
            metrics["A"],
            ProbeResult {
                target_name: "A".into(),
                protocol: Transport::Tcp,
                rtt_ms: 12.0
            }
        );
        assert!(!metrics.contains_key("B"));
        assert_eq!(metrics["C"].protocol, Transport::Udp);
        assert_eq!(metrics["C"].rtt_ms, 30.0);

        // Both transports are always attempted.
        assert_eq!(prober.calls.load(Ordering::SeqCst), 6);
    }

    /// Answers by host address, so targets sharing a name can differ.
    struct HostProber {
        script: HashMap<(Ipv4Addr, Transport), f64>,
    }

    #[async_trait]
    impl Prober for HostProber {
        async fn probe(&self, target: &Target, transport: Transport) -> ProbeOutcome {
            match self.script.get(&(target.host, transport)) {
                Some(&rtt_ms) => ProbeOutcome::Success { rtt_ms },
                None => ProbeOutcome::Failure {
                    reason: ProbeError::Refused,
                },
            }
        }
    }

    #[tokio::test]
    async fn later_target_with_same_name_wins() {
        let first = trunk("dup", 1);
        let second = Target::discovered("dup", Ipv4Addr::new(10, 1, 2, 3), 5070);
        let prober = Arc::new(HostProber {
            script: HashMap::from([
                ((first.host, Transport::Tcp), 4.0),
                ((second.host, Transport::Udp), 7.0),
            ]),
        });

        let metrics = run_cycle(prober, vec![first, second], 8).await;

        assert_eq!(metrics.len(), 1);
        assert_eq!(
            metrics["dup"],
            ProbeResult {
                target_name: "dup".into(),
                protocol: Transport::Udp,
                rtt_ms: 7.0
            }
        );
    }

    #[tokio::test]
    async fn oversized_pool_is_clamped() {
        let prober = Arc::new(ScriptedProber::new(&[("A", Transport::Udp, Some(1.5))]));
        let metrics = run_cycle(prober, vec![trunk("A", 1)], usize::MAX).await;
        assert_eq!(metrics["A"].rtt_ms, 1.5);
    }

    #[tokio::test]
    async fn empty_target_list_yields_empty_metrics() {
        let prober = Arc::new(ScriptedProber::new(&[]));
        assert!(run_cycle(prober, Vec::new(), 4).await.is_empty());
    }
}
