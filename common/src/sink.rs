use async_trait::async_trait;

use crate::error::SinkError;

/// One RTT sample as handed to the metrics sink.
#[derive(Debug, Clone, PartialEq)]
pub struct RttPoint {
    pub measurement: String,
    pub host: String,
    pub source: String,
    pub target: String,
    pub protocol: String,
    pub rtt_ms: f64,
    pub timestamp_ns: i64,
}

/// Destination of per-cycle measurements.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn write(&self, point: &RttPoint) -> Result<(), SinkError>;
}
