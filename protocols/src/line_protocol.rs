//! InfluxDB v2 line protocol encoding for RTT points.
//!
//! ```text
//! sip_rtt_metrics,host=redis01,protocol=udp,source=sip_rtt_checker,target=trunk253 rtt=12.5 1700000000000000000
//! ```
//!
//! See: <https://docs.influxdata.com/influxdb/v2/reference/syntax/line-protocol/>

use siprtt_common::sink::RttPoint;

/// Encodes one point. Tags are written sorted by key.
pub fn encode_point(point: &RttPoint) -> String {
    let mut line = escape_measurement(&point.measurement);

    let tags = [
        ("host", point.host.as_str()),
        ("protocol", point.protocol.as_str()),
        ("source", point.source.as_str()),
        ("target", point.target.as_str()),
    ];
    for (key, value) in tags {
        // Empty tag values are not representable.
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(key);
        line.push('=');
        line.push_str(&escape_tag(value));
    }

    line.push_str(" rtt=");
    line.push_str(&format_float(point.rtt_ms));
    line.push(' ');
    line.push_str(&point.timestamp_ns.to_string());
    line
}

fn format_float(v: f64) -> String {
    if v.is_finite() {
        format!("{v}")
    } else {
        "0".to_string()
    }
}

fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

fn escape_tag(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}
