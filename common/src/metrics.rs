//! Per-attempt outcomes and the per-cycle result map.

use std::collections::BTreeMap;

use crate::error::ProbeError;
use crate::network::transport::Transport;

/// Terminal state of one `(target, transport)` attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Success { rtt_ms: f64 },
    Failure { reason: ProbeError },
}

impl ProbeOutcome {
    pub fn rtt_ms(&self) -> Option<f64> {
        match self {
            ProbeOutcome::Success { rtt_ms } => Some(*rtt_ms),
            ProbeOutcome::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeAttempt {
    pub target_name: String,
    pub transport: Transport,
    pub outcome: ProbeOutcome,
}

/// The single measurement kept for a target after selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub target_name: String,
    pub protocol: Transport,
    pub rtt_ms: f64,
}

/// Target name to selected result. Built fresh every cycle.
pub type CycleMetrics = BTreeMap<String, ProbeResult>;
