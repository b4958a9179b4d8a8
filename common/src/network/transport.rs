use std::fmt;

/// The two transport kinds every target is probed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Transport {
    /// Connection-oriented: connect, send, wait for the first bytes back.
    Tcp,
    /// Connectionless: one datagram out, one datagram back.
    Udp,
}

impl Transport {
    /// Evaluation order of a probe round. Ties are resolved in favour of the first entry.
    pub const PROBE_ORDER: [Transport; 2] = [Transport::Tcp, Transport::Udp];

    /// Lowercase name, as reported in metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Tcp => "tcp",
            Transport::Udp => "udp",
        }
    }

    /// Uppercase token used in the `Via` header.
    pub fn via_token(&self) -> &'static str {
        match self {
            Transport::Tcp => "TCP",
            Transport::Udp => "UDP",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
