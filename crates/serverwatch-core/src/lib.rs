//! # serverwatch-core
//!
//! Client-side core of the serverwatch monitoring console.
//!
//! The crate talks to a server-monitoring backend and turns each operator
//! action into a stream of view states that a front end can render.
//!
//! ## Components
//!
//! - **Gateway** ([`ServerGateway`], [`HttpGateway`]): list, save, delete and
//!   ping servers over HTTP, and filter a fetched collection locally.
//! - **Projector** ([`Projector`]): owns the cached collection and publishes
//!   `Loading` → `Loaded | Error` transitions for every action.
//! - **Notifier** ([`Notifier`]): receives one notification per finished action.
//!
//! ```text
//! action ──► Projector ──► ServerGateway ──► backend
//!               │
//!               ├──► ViewState (watch + broadcast)
//!               └──► Notifier
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use serverwatch_core::{GatewayConfig, HttpGateway, Projector, StatusFilter, TracingNotifier};
//!
//! # async fn example() -> Result<(), serverwatch_core::ConfigError> {
//! let gateway = HttpGateway::new(&GatewayConfig::default())?;
//! let projector = Projector::new(gateway, TracingNotifier);
//!
//! projector.initial_load().await;
//! projector.filter(StatusFilter::ServerUp);
//! println!("{} servers up", projector.current().servers().len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod projector;
pub mod report;
pub mod state;
pub mod types;

pub use config::{DEFAULT_BASE_URL, GatewayConfig};
pub use error::{ConfigError, GatewayError, GatewayResult, ReportError};
pub use gateway::{HttpGateway, ServerGateway, filter_servers};
pub use notify::{Notification, NotificationKind, Notifier, RecordingNotifier, TracingNotifier};
pub use projector::Projector;
pub use report::REPORT_FILE_NAME;
pub use state::ViewState;
pub use types::{
    Server, ServerCollectionResponse, ServerFields, ServerId, ServerStatus, StatusFilter,
};
