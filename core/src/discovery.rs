//! # Target Discovery
//!
//! Builds the list of targets probed in a cycle:
//! 1. every statically configured trunk, then
//! 2. when user checks are enabled, every contact registered in the location store.
//!
//! Each location key holds a JSON array of contact records. Unreadable keys, malformed
//! records and unparseable contact URIs are logged and skipped one by one.

use std::sync::Arc;

use serde_json::Value;
use siprtt_common::config::Config;
use siprtt_common::network::target::Target;
use siprtt_common::store::LocationStore;
use siprtt_protocols::contact;
use tracing::{debug, info, warn};

const CONTACT_FIELD: &str = "contact";

pub struct TargetSource {
    trunks: Vec<Target>,
    location: Option<LocationScan>,
}

struct LocationScan {
    store: Arc<dyn LocationStore>,
    prefix: String,
}

impl TargetSource {
    /// `store` is only consulted when `cfg.check_users` is set.
    pub fn new(cfg: &Config, store: Option<Arc<dyn LocationStore>>) -> Self {
        let trunks: Vec<Target> = cfg.trunks.iter().map(Target::from).collect();

        let location = match (cfg.check_users, store) {
            (true, Some(store)) => Some(LocationScan {
                store,
                prefix: cfg.location_prefix.clone(),
            }),
            (true, None) => {
                warn!("User checks enabled but no location store available, probing trunks only");
                None
            }
            (false, _) => None,
        };

        Self { trunks, location }
    }

    pub fn discovery_enabled(&self) -> bool {
        self.location.is_some()
    }

    /// Enumerates this cycle's targets. Never fails: store trouble only shrinks the list.
    pub async fn enumerate(&self) -> Vec<Target> {
        let mut targets: Vec<Target> = self.trunks.clone();

        if let Some(scan) = &self.location {
            let discovered = scan.discover().await;
            info!(
                "{} trunks and {} registered contacts queued",
                self.trunks.len(),
                discovered.len()
            );
            targets.extend(discovered);
        }

        targets
    }
}

impl LocationScan {
    async fn discover(&self) -> Vec<Target> {
        let mut keys: Vec<String> = match self.store.keys(&self.prefix).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to list location keys under '{}': {e}", self.prefix);
                return Vec::new();
            }
        };
        keys.sort();

        let mut targets: Vec<Target> = Vec::new();
        for key in keys {
            let raw: String = match self.store.get(&key).await {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    debug!("Location key {key} expired before it could be read");
                    continue;
                }
                Err(e) => {
                    warn!("Error reading key {key}: {e}");
                    continue;
                }
            };

            let user: &str = key.strip_prefix(&self.prefix).unwrap_or(&key);
            targets.extend(contacts_to_targets(&key, user, &raw));
        }

        targets
    }
}

/// Turns one key's JSON array of contact records into targets named `user`.
fn contacts_to_targets(key: &str, user: &str, raw: &str) -> Vec<Target> {
    let records: Vec<Value> = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(Value::Object(record)) => vec![Value::Object(record)],
        Ok(other) => {
            warn!("Error parsing key {key}: expected an array of contacts, found {other}");
            return Vec::new();
        }
        Err(e) => {
            warn!("Error parsing key {key}: {e}");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let uri = match contact_uri(record) {
                Ok(uri) => uri,
                Err(reason) => {
                    warn!("Skipping record {idx} of key {key}: {reason}");
                    return None;
                }
            };

            match contact::parse_contact_uri(&uri) {
                Some((host, port)) => Some(Target::discovered(user, host, port)),
                None => {
                    debug!("Skipping record {idx} of key {key}: unsupported contact '{uri}'");
                    None
                }
            }
        })
        .collect()
}

/// Reads the contact field of a record. Records stored as JSON text are decoded first.
fn contact_uri(record: Value) -> Result<String, String> {
    let record: Value = match record {
        Value::String(text) => {
            serde_json::from_str(&text).map_err(|e| format!("invalid JSON record: {e}"))?
        }
        other => other,
    };

    match record.get(CONTACT_FIELD) {
        Some(Value::String(uri)) => Ok(uri.clone()),
        Some(other) => Err(format!("'{CONTACT_FIELD}' is not a string: {other}")),
        None => Err(format!("missing '{CONTACT_FIELD}' field")),
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
