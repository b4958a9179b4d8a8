//! # Probe Target Model
//!
//! A target is one named SIP endpoint probed during a cycle. It is either:
//! * A statically configured **trunk**.
//! * A **discovered** user contact taken from the location store.
//!
//! Only dotted-quad IPv4 literals are accepted as hosts.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Port assumed when an endpoint omits one.
pub const DEFAULT_SIP_PORT: u16 = 5060;

/// Where a target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Static,
    Discovered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub host: Ipv4Addr,
    pub port: u16,
    pub origin: Origin,
}

impl Target {
    pub fn trunk(name: impl Into<String>, host: Ipv4Addr, port: u16) -> Self {
        Self {
            name: name.into(),
            host,
            port,
            origin: Origin::Static,
        }
    }

    pub fn discovered(name: impl Into<String>, host: Ipv4Addr, port: u16) -> Self {
        Self {
            name: name.into(),
            host,
            port,
            origin: Origin::Discovered,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.host, self.port))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.host, self.port)
    }
}

/// Parses a configured endpoint like "10.65.0.253" or "10.65.0.253:5070".
pub fn parse_endpoint(s: &str) -> Result<(Ipv4Addr, u16), String> {
    let s = s.trim();
    let (host_str, port_str) = match s.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (s, None),
    };

    let host = host_str
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("invalid IPv4 host '{host_str}': {e}"))?;

    let port = match port_str {
        Some(p) => p
            .parse::<u16>()
            .map_err(|e| format!("invalid port '{p}': {e}"))?,
        None => DEFAULT_SIP_PORT,
    };

    if port == 0 {
        return Err("port 0 is not addressable".to_string());
    }

    Ok((host, port))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint() {
        assert_eq!(
            parse_endpoint("10.65.0.253"),
            Ok((Ipv4Addr::new(10, 65, 0, 253), 5060))
        );
        assert_eq!(
            parse_endpoint(" 10.65.0.250:5070 "),
            Ok((Ipv4Addr::new(10, 65, 0, 250), 5070))
        );

        // --- Error Cases ---
        assert!(parse_endpoint("pbx.example.com").is_err());
        assert!(parse_endpoint("10.0.0.1:99999").is_err());
        assert!(parse_endpoint("10.0.0.1:0").is_err());
        assert!(parse_endpoint("::1").is_err());
        assert!(parse_endpoint("").is_err());
    }

    #[test]
    fn test_target_addressing() {
        let trunk = Target::trunk("trunk253", Ipv4Addr::new(10, 65, 0, 253), 5060);
        assert_eq!(trunk.origin, Origin::Static);
        assert_eq!(trunk.socket_addr().to_string(), "10.65.0.253:5060");
        assert_eq!(trunk.to_string(), "trunk253 (10.65.0.253:5060)");

        let user = Target::discovered("1001", Ipv4Addr::new(10, 1, 2, 3), 5070);
        assert_eq!(user.origin, Origin::Discovered);
    }
}
