//! Shared building blocks for the `siprtt` workspace.
//!
//! * **[`config`]**: the startup configuration value handed to every component.
//! * **[`network`]**: probe targets and transport kinds.
//! * **[`metrics`]**: per-attempt outcomes and the per-cycle result map.
//! * **[`store`]** / **[`sink`]**: outbound ports for the location store and the metrics sink.
//! * **[`error`]**: error types shared across crates.

pub mod config;
pub mod error;
pub mod metrics;
pub mod network;
pub mod sink;
pub mod store;
