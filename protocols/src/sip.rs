//! SIP `OPTIONS` probe requests.
//!
//! Requests are rendered by hand as text. Header lines end in a bare LF unless
//! [`LineEnding::CrLf`] is selected.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use siprtt_common::network::transport::Transport;

const SIP_VERSION: &str = "SIP/2.0";
const BRANCH_MAGIC_COOKIE: &str = "z9hG4bK";
const MONITOR_URI: &str = "sip:rtt-monitor@monitor.local";
const MONITOR_USER: &str = "rtt-monitor";
const MAX_FORWARDS: u8 = 70;
const USER_AGENT: &str = "SIP RTT Monitor";

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Value shared by `Call-ID`, the `Via` branch and the `From` tag of one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Creates a token unique to this attempt.
    ///
    /// Layout is `<random hex>-<unix millis>-<sequence>@<local ip>`.
    pub fn generate(local_ip: Ipv4Addr) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let salt: u32 = rand::random();

        Self(format!("{salt:08x}-{millis}-{seq}@{local_ip}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Via` branch parameter: the magic cookie followed by the first 8 characters.
    pub fn branch(&self) -> String {
        format!("{BRANCH_MAGIC_COOKIE}{}", self.prefix(8))
    }

    /// `From` tag: the first 4 characters.
    pub fn tag(&self) -> &str {
        self.prefix(4)
    }

    fn prefix(&self, chars: usize) -> &str {
        match self.0.char_indices().nth(chars) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders `OPTIONS` requests on behalf of one local endpoint.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    local_ip: Ipv4Addr,
    local_port: u16,
    line_ending: LineEnding,
}

impl OptionsBuilder {
    pub fn new(local_ip: Ipv4Addr, local_port: u16, line_ending: LineEnding) -> Self {
        Self {
            local_ip,
            local_port,
            line_ending,
        }
    }

    pub fn local_ip(&self) -> Ipv4Addr {
        self.local_ip
    }

    /// Builds the complete request text, terminated by an empty line.
    pub fn build(
        &self,
        host: Ipv4Addr,
        port: u16,
        transport: Transport,
        call_id: &CorrelationId,
    ) -> String {
        let local = format!("{}:{}", self.local_ip, self.local_port);
        let lines = [
            format!("OPTIONS sip:{host}:{port} {SIP_VERSION}"),
            format!(
                "Via: {SIP_VERSION}/{} {local};branch={}",
                transport.via_token(),
                call_id.branch()
            ),
            format!("From: <{MONITOR_URI}>;tag={}", call_id.tag()),
            format!("To: <sip:{host}:{port}>"),
            format!("Call-ID: {call_id}"),
            "CSeq: 1 OPTIONS".to_string(),
            format!("Contact: <sip:{MONITOR_USER}@{local}>"),
            format!("Max-Forwards: {MAX_FORWARDS}"),
            format!("User-Agent: {USER_AGENT}"),
            "Content-Length: 0".to_string(),
        ];

        let eol = self.line_ending.as_str();
        let mut request = String::with_capacity(512);
        for line in &lines {
            request.push_str(line);
            request.push_str(eol);
        }
        request.push_str(eol);
        request
    }
}

/// First line of a SIP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub code: u16,
    pub reason: String,
}

/// Reads the status line at the start of `bytes`, if it is a SIP response.
pub fn parse_status_line(bytes: &[u8]) -> Option<StatusLine> {
    let text = std::str::from_utf8(bytes).ok().or_else(|| {
        let end = bytes.iter().position(|b| *b == b'\n')?;
        std::str::from_utf8(&bytes[..end]).ok()
    })?;
    let line = text.lines().next()?.trim_end_matches('\r');

    let rest = line.strip_prefix(SIP_VERSION)?.strip_prefix(' ')?;
    let (code_str, reason) = rest.split_once(' ').unwrap_or((rest, ""));
    if code_str.len() != 3 {
        return None;
    }
    let code = code_str.parse::<u16>().ok().filter(|c| (100..700).contains(c))?;

    Some(StatusLine {
        code,
        reason: reason.to_string(),
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
