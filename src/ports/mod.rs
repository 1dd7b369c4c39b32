//! Port traits: the I/O seams of the domain.

pub mod config_port;
pub mod price_port;
pub mod report_port;
