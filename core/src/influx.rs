//! InfluxDB v2 HTTP [`MetricsSink`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use siprtt_common::config::InfluxConfig;
use siprtt_common::error::SinkError;
use siprtt_common::sink::{MetricsSink, RttPoint};
use siprtt_protocols::line_protocol;

const WRITE_PATH: &str = "/api/v2/write";

pub struct InfluxSink {
    client: Client,
    write_url: Url,
    auth_header: String,
}

impl InfluxSink {
    pub fn new(cfg: &InfluxConfig, request_timeout: Duration) -> Result<Self, SinkError> {
        let base = cfg.url.trim_end_matches('/');
        let write_url = Url::parse_with_params(
            &format!("{base}{WRITE_PATH}"),
            &[
                ("org", cfg.org.as_str()),
                ("bucket", cfg.bucket.as_str()),
                ("precision", "ns"),
            ],
        )
        .map_err(|e| SinkError::Transport(format!("invalid InfluxDB url '{}': {e}", cfg.url)))?;

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            write_url,
            auth_header: format!("Token {}", cfg.token),
        })
    }
}

#[async_trait]
impl MetricsSink for InfluxSink {
    async fn write(&self, point: &RttPoint) -> Result<(), SinkError> {
        let body: String = line_protocol::encode_point(point);

        let response = self
            .client
            .post(self.write_url.clone())
            .header(AUTHORIZATION, &self.auth_header)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Rejected {
            status: status.as_u16(),
            body,
        })
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
