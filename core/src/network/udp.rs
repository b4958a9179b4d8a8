use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use siprtt_common::error::ProbeError;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use super::{Exchange, RECV_BUFFER_SIZE};

/// One datagram out, the first datagram back.
///
/// The socket is connected to `addr`, so only the peer's datagrams are accepted and an
/// ICMP port-unreachable surfaces as [`ProbeError::Refused`].
pub async fn exchange(
    addr: SocketAddr,
    request: &[u8],
    deadline: Duration,
) -> Result<Exchange, ProbeError> {
    let socket: UdpSocket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.connect(addr).await?;

    let start: Instant = Instant::now();

    timeout(deadline, socket.send(request))
        .await
        .map_err(|_elapsed| ProbeError::Timeout(deadline))??;

    let mut buf: Vec<u8> = vec![0u8; RECV_BUFFER_SIZE];
    let read: usize = timeout(deadline, socket.recv(&mut buf))
        .await
        .map_err(|_elapsed| ProbeError::Timeout(deadline))??;

    let elapsed: Duration = start.elapsed();
    buf.truncate(read);

    Ok(Exchange {
        elapsed,
        response: buf,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
