use std::net::SocketAddr;
use std::time::{Duration, Instant};

use siprtt_common::error::ProbeError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::{Exchange, RECV_BUFFER_SIZE};

/// Connect, send, read. The clock starts before the connect.
pub async fn exchange(
    addr: SocketAddr,
    request: &[u8],
    deadline: Duration,
) -> Result<Exchange, ProbeError> {
    let start: Instant = Instant::now();

    let mut stream: TcpStream = timeout(deadline, TcpStream::connect(addr))
        .await
        .map_err(|_elapsed| ProbeError::Timeout(deadline))??;

    timeout(deadline, stream.write_all(request))
        .await
        .map_err(|_elapsed| ProbeError::Timeout(deadline))??;

    let mut buf: Vec<u8> = vec![0u8; RECV_BUFFER_SIZE];
    let read: usize = timeout(deadline, stream.read(&mut buf))
        .await
        .map_err(|_elapsed| ProbeError::Timeout(deadline))??;

    let elapsed: Duration = start.elapsed();
    if read == 0 {
        return Err(ProbeError::Closed);
    }
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
