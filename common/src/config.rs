//! # Runtime Configuration
//!
//! Loaded once at startup from an INI file (by default `/etc/OPS.conf`) and then
//! overlaid with `SIPRTT_`-prefixed environment variables, e.g.
//! `SIPRTT_GLOBAL__CHECK_USERS=true`.
//!
//! ```ini
//! [global]
//! redis_host = 10.65.0.10
//! influxdb_url = http://10.65.0.20:8086
//! local_ip = 10.65.0.61
//! check_users = true
//!
//! [trunks]
//! trunk253 = 10.65.0.253
//! trunk250 = 10.65.0.250:5070
//! ```
//!
//! The resulting [`Config`] is immutable and passed by reference into every component.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use config::{Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::network::target::{Target, parse_endpoint};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/OPS.conf";

/// Upper bound on in-flight probe attempts.
pub const MAX_CONCURRENCY: usize = 65_536;
const ENV_PREFIX: &str = "SIPRTT";

#[derive(Debug, Clone)]
pub struct Config {
    pub probe: ProbeConfig,
    pub redis: RedisConfig,
    pub influx: InfluxConfig,
    /// Statically configured trunks, sorted by name.
    pub trunks: Vec<Trunk>,
    /// Enables discovery of registered user contacts from the location store.
    pub check_users: bool,
    /// Key namespace scanned in the location store.
    pub location_prefix: String,
    /// Cadence of the probe loop.
    pub interval: Duration,
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Address advertised in `Via` and `Contact`.
    pub local_ip: Ipv4Addr,
    pub local_port: u16,
    /// Deadline applied to each connect, send and receive.
    pub timeout: Duration,
    /// Upper bound on attempts in flight at once.
    pub max_concurrency: usize,
    /// Frames requests with CRLF instead of bare LF.
    pub crlf: bool,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
}

#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    pub measurement: String,
    pub source_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trunk {
    pub name: String,
    pub host: Ipv4Addr,
    pub port: u16,
}

impl From<&Trunk> for Target {
    fn from(trunk: &Trunk) -> Self {
        Target::trunk(trunk.name.clone(), trunk.host, trunk.port)
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    global: GlobalSection,
    #[serde(default)]
    trunks: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GlobalSection {
    redis_host: String,
    redis_port: u16,
    redis_password: Option<String>,
    redis_db: i64,
    influxdb_url: String,
    influxdb_token: String,
    influxdb_org: String,
    influxdb_bucket: String,
    local_ip: String,
    local_port: u16,
    check_users: bool,
    probe_timeout_ms: u64,
    interval_secs: u64,
    max_concurrency: usize,
    crlf: bool,
    location_prefix: String,
    measurement: String,
    source_tag: String,
}

impl Default for GlobalSection {
    fn default() -> Self {
        Self {
            redis_host: "localhost".into(),
            redis_port: 6379,
            redis_password: None,
            redis_db: 0,
            influxdb_url: "http://localhost:8086".into(),
            influxdb_token: "my-token".into(),
            influxdb_org: "TCB".into(),
            influxdb_bucket: "ASTERRISK-OPS".into(),
            local_ip: "10.65.0.61".into(),
            local_port: 5061,
            check_users: false,
            probe_timeout_ms: 2_000,
            interval_secs: 60,
            max_concurrency: 32,
            crlf: false,
            location_prefix: "ul:location:".into(),
            measurement: "sip_rtt_metrics".into(),
            source_tag: "sip_rtt_checker".into(),
        }
    }
}

impl Config {
    /// Reads the INI file at `path` and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }

        let raw: RawConfig = config::Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(true))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    /// Parses INI text without consulting the environment.
    pub fn from_ini_str(ini: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .add_source(File::from_str(ini, FileFormat::Ini))
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let g = raw.global;

        let local_ip = g
            .local_ip
            .trim()
            .parse::<Ipv4Addr>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "local_ip",
                reason: e.to_string(),
            })?;

        ensure_positive("probe_timeout_ms", g.probe_timeout_ms)?;
        ensure_positive("interval_secs", g.interval_secs)?;
        ensure_positive("max_concurrency", g.max_concurrency as u64)?;
        if g.max_concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::InvalidValue {
                key: "max_concurrency",
                reason: format!("must not exceed {MAX_CONCURRENCY}"),
            });
        }

        let trunks = raw
            .trunks
            .into_iter()
            .map(|(name, endpoint)| {
                let (host, port) = parse_endpoint(&endpoint)
                    .map_err(|reason| ConfigError::InvalidTrunk {
                        name: name.clone(),
                        reason,
                    })?;
                Ok(Trunk { name, host, port })
            })
            .collect::<Result<Vec<Trunk>, ConfigError>>()?;

        Ok(Self {
            probe: ProbeConfig {
                local_ip,
                local_port: g.local_port,
                timeout: Duration::from_millis(g.probe_timeout_ms),
                max_concurrency: g.max_concurrency,
                crlf: g.crlf,
            },
            redis: RedisConfig {
                host: g.redis_host,
                port: g.redis_port,
                password: g.redis_password.filter(|p| !p.is_empty()),
                db: g.redis_db,
            },
            influx: InfluxConfig {
                url: g.influxdb_url,
                token: g.influxdb_token,
                org: g.influxdb_org,
                bucket: g.influxdb_bucket,
                measurement: g.measurement,
                source_tag: g.source_tag,
            },
            trunks,
            check_users: g.check_users,
            location_prefix: g.location_prefix,
            interval: Duration::from_secs(g.interval_secs),
        })
    }
}

fn ensure_positive(key: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            reason: "must be greater than zero".into(),
        });
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
