//! Wire formats spoken by `siprtt`. Pure functions only, no I/O.
//!
//! * [`sip`]: `OPTIONS` request builder, correlation ids and status-line reader.
//! * [`contact`]: extraction of an IPv4 host/port pair from a registered contact URI.
//! * [`line_protocol`]: InfluxDB line protocol encoding of RTT points.

pub mod contact;
pub mod line_protocol;
pub mod sip;
