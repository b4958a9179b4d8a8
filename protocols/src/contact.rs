//! Contact URI parsing.
//!
//! Registration records carry contacts such as `<sip:1001@10.1.2.3:5070;transport=udp>`.
//! Only IPv4 literal hosts are understood; domain names and IPv6 references yield `None`.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;
use siprtt_common::network::target::DEFAULT_SIP_PORT;

static CONTACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"sips?:[^@\s<>]*@(\d{1,3}(?:\.\d{1,3}){3})(?::(\d{1,5}))?(?:$|[;>?\s])")
        .unwrap_or_else(|e| panic!("contact pattern does not compile: {e}"))
});

/// Extracts `(host, port)` from a contact URI, defaulting the port to 5060.
pub fn parse_contact_uri(uri: &str) -> Option<(Ipv4Addr, u16)> {
    let caps = CONTACT_RE.captures(uri)?;

    let host = caps.get(1)?.as_str().parse::<Ipv4Addr>().ok()?;
    let port = match caps.get(2) {
        Some(p) => p.as_str().parse::<u16>().ok().filter(|p| *p != 0)?,
        None => DEFAULT_SIP_PORT,
    };

    Some((host, port))
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
    fn parses_host_and_explicit_port() {
        assert_eq!(
            parse_contact_uri("sip:alice@10.1.2.3:5070"),
            Some((Ipv4Addr::new(10, 1, 2, 3), 5070))
        );
    }

    #[test]
    fn defaults_port_to_5060() {
        assert_eq!(
            parse_contact_uri("sip:bob@10.1.2.4"),
            Some((Ipv4Addr::new(10, 1, 2, 4), 5060))
        );
    }

    #[test]
    fn accepts_bracketed_contacts_with_params() {
        assert_eq!(
            parse_contact_uri("<sip:1001@192.168.7.20:5062;transport=udp;ob>"),
            Some((Ipv4Addr::new(192, 168, 7, 20), 5062))
        );
        assert_eq!(
            parse_contact_uri("\"Desk\" <sip:1002@192.168.7.21>;expires=3600"),
            Some((Ipv4Addr::new(192, 168, 7, 21), 5060))
        );
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(parse_contact_uri("not-a-uri"), None);
        assert_eq!(parse_contact_uri(""), None);
        assert_eq!(parse_contact_uri("sip:carol@pbx.example.com:5060"), None);
        assert_eq!(parse_contact_uri("sip:dave@[2001:db8::1]:5060"), None);
        assert_eq!(parse_contact_uri("sip:erin@10.1.2.300"), None);
        assert_eq!(parse_contact_uri("sip:frank@10.1.2.3:70000"), None);
        assert_eq!(parse_contact_uri("sip:gina@10.1.2.3.example.com"), None);
    }
}
