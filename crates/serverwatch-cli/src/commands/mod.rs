//! CLI command implementations.
//!
//! - [`servers`] - list, ping, add, delete and report

pub mod servers;

pub use servers::ServerCommand;
