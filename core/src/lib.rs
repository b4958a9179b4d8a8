//! Probing engine of `siprtt`.
//!
//! * [`discovery`]: enumerates the targets of a cycle (trunks plus registered contacts).
//! * [`prober`]: one SIP `OPTIONS` exchange over one transport.
//! * [`scanner`]: drives both transports for every target and selects one result each.
//! * [`monitor`]: cycle orchestration, sink push and the cadence loop.
//! * [`location`] / [`influx`]: Redis and InfluxDB adapters for the outbound ports.

pub mod discovery;
pub mod influx;
pub mod location;
pub mod monitor;
pub mod network;
pub mod prober;
pub mod scanner;
