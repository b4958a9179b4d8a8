use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use siprtt_common::error::{SinkError, StoreError};
use siprtt_common::sink::{MetricsSink, RttPoint};
use siprtt_common::store::LocationStore;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};

pub const OK_RESPONSE: &[u8] = b"SIP/2.0 200 OK\r\nContent-Length: 0\r\n\r\n";

/// A loopback SIP peer answering on the same port over TCP and UDP.
pub struct Responder {
    pub port: u16,
}

impl Responder {
    /// Each transport waits its own delay before answering.
    pub async fn spawn(tcp_delay: Duration, udp_delay: Duration) -> Self {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let udp = UdpSocket::bind((Ipv4Addr::LOCALHOST, port)).await.unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 2048];
                    if sock.read(&mut buf).await.unwrap_or(0) > 0 {
                        tokio::time::sleep(tcp_delay).await;
                        let _ = sock.write_all(OK_RESPONSE).await;
                    }
                });
            }
        });

        tokio::spawn(async move {
            let mut buf = [0u8; 2048];
            while let Ok((_, from)) = udp.recv_from(&mut buf).await {
                tokio::time::sleep(udp_delay).await;
                let _ = udp.send_to(OK_RESPONSE, from).await;
            }
        });

        Self { port }
    }
}

/// Returns a loopback port nothing listens on over either transport.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

#[derive(Default)]
pub struct MemoryStore {
    pub entries: BTreeMap<String, String>,
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub points: Mutex<Vec<RttPoint>>,
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn write(&self, point: &RttPoint) -> Result<(), SinkError> {
        self.points.lock().unwrap().push(point.clone());
        Ok(())
    }
}
