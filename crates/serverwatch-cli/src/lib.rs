//! # serverwatch-cli
//!
//! Command-line front end for a server-monitoring backend.
//!
//! Provides commands for:
//! - Listing servers, optionally filtered by status
//! - Pinging a server by IP address
//! - Adding and deleting servers
//! - Exporting the server table as a spreadsheet report
//!
//! # Architecture
//!
//! Each invocation drives a [`serverwatch_core::Projector`] over the HTTP
//! gateway for one action and prints the final view state.
//!
//! ```text
//! ┌─────────────┐   Projector   ┌─────────────┐    HTTP    ┌─────────┐
//! │ serverwatch │──────────────►│ HttpGateway │───────────►│ backend │
//! └─────────────┘               └─────────────┘            └─────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod notify;
pub mod output;

pub use cli::{AddArgs, Cli, Commands, Format, StatusArg};
pub use commands::ServerCommand;
pub use error::CliError;
pub use notify::StderrNotifier;
pub use output::OutputFormat;
