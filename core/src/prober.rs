//! A single SIP `OPTIONS` probe over one transport.

use std::time::Duration;

use async_trait::async_trait;
use siprtt_common::config::ProbeConfig;
use siprtt_common::metrics::ProbeOutcome;
use siprtt_common::network::target::Target;
use siprtt_common::network::transport::Transport;
use siprtt_protocols::sip::{self, CorrelationId, LineEnding, OptionsBuilder};
use tracing::{debug, warn};

use crate::network::{self, Exchange};

/// Runs one attempt against one target. Failures are values, never errors.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &Target, transport: Transport) -> ProbeOutcome;
}

pub struct SipProber {
    builder: OptionsBuilder,
    deadline: Duration,
}

impl SipProber {
    pub fn new(cfg: &ProbeConfig) -> Self {
        let line_ending = if cfg.crlf {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };

        Self {
            builder: OptionsBuilder::new(cfg.local_ip, cfg.local_port, line_ending),
            deadline: cfg.timeout,
        }
    }
}

#[async_trait]
impl Prober for SipProber {
    async fn probe(&self, target: &Target, transport: Transport) -> ProbeOutcome {
        let call_id = CorrelationId::generate(self.builder.local_ip());
        let request: String = self
            .builder
            .build(target.host, target.port, transport, &call_id);

        let result =
            network::exchange(transport, target.socket_addr(), request.as_bytes(), self.deadline)
                .await;

        match result {
            Ok(Exchange { elapsed, response }) => {
                let rtt_ms: f64 = elapsed.as_secs_f64() * 1_000.0;
                match sip::parse_status_line(&response) {
                    Some(status) => debug!(
                        peer = %target.name,
                        %transport,
                        code = status.code,
                        rtt_ms,
                        "{} answered {} {}", target, status.code, status.reason
                    ),
                    None => debug!(
                        peer = %target.name,
                        %transport,
                        bytes = response.len(),
                        rtt_ms,
                        "{} answered with a non-SIP payload", target
                    ),
                }
                ProbeOutcome::Success { rtt_ms }
            }
            Err(reason) => {
                warn!(
                    peer = %target.name,
                    %transport,
                    "{} - {} timeout/error: {}", target.name, transport, reason
                );
                ProbeOutcome::Failure { reason }
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
