pub mod target;
pub mod transport;
