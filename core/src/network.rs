//! Socket-level request/response exchanges.

use std::net::SocketAddr;
use std::time::Duration;

use siprtt_common::error::ProbeError;
use siprtt_common::network::transport::Transport;

pub mod tcp;
pub mod udp;

/// Largest response prefix read back. Only the first bytes matter.
pub(crate) const RECV_BUFFER_SIZE: usize = 2048;

/// A completed exchange: time to first response bytes, and those bytes.
#[derive(Debug)]
pub struct Exchange {
    pub elapsed: Duration,
    pub response: Vec<u8>,
}

/// Sends `request` to `addr` over `transport` and waits for the first response bytes.
///
/// `deadline` bounds each individual socket operation.
pub async fn exchange(
    transport: Transport,
    addr: SocketAddr,
    request: &[u8],
    deadline: Duration,
) -> Result<Exchange, ProbeError> {
    match transport {
        Transport::Tcp => tcp::exchange(addr, request, deadline).await,
        Transport::Udp => udp::exchange(addr, request, deadline).await,
    }
}
