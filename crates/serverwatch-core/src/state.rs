//! View states published by the projector.

use serde::Serialize;

use crate::types::{Server, ServerCollectionResponse};

/// What the UI should currently render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight. `stale` keeps the last known data on screen.
    Loading {
        /// Previously cached payload, if any.
        stale: Option<ServerCollectionResponse>,
    },
    /// A request finished with data.
    Loaded(ServerCollectionResponse),
    /// A request failed.
    Error {
        /// Normalised error text.
        message: String,
    },
}

impl ViewState {
    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Whether data is available.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Whether the last request failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Payload to render, including stale data while loading.
    #[must_use]
    pub fn payload(&self) -> Option<&ServerCollectionResponse> {
        match self {
            Self::Loaded(payload) => Some(payload),
            Self::Loading { stale } => stale.as_ref(),
            Self::Idle | Self::Error { .. } => None,
        }
    }

    /// Servers to render; empty when there is no payload.
    #[must_use]
    pub fn servers(&self) -> &[Server] {
        self.payload()
            .map_or(&[][..], |payload| payload.servers.as_slice())
    }

    /// Error text, if the state is an error.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Short lowercase name of the state.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Loaded(_) => "loaded",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ServerStatus, server};

    #[test]
    fn default_is_idle() {
        let state = ViewState::default();
        assert_eq!(state, ViewState::Idle);
        assert!(state.payload().is_none());
        assert!(state.servers().is_empty());
    }

    #[test]
    fn loading_exposes_stale_payload() {
        let stale = ServerCollectionResponse::new(
            "cached",
            vec![server(1, "10.0.0.1", ServerStatus::ServerUp)],
        );
        let state = ViewState::Loading { stale: Some(stale) };

        assert!(state.is_loading());
        assert_eq!(state.servers().len(), 1);
    }

    #[test]
    fn error_has_no_payload() {
        let state = ViewState::Error {
            message: "An Error occurred - Error code: 0".into(),
        };
        assert!(state.is_error());
        assert!(state.payload().is_none());
        assert_eq!(state.error(), Some("An Error occurred - Error code: 0"));
    }

    #[test]
    fn serializes_with_state_tag() {
        let state = ViewState::Loaded(ServerCollectionResponse::new("ok", Vec::new()));
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["state"], "loaded");
        assert_eq!(json["message"], "ok");

        let json = serde_json::to_value(ViewState::Idle).unwrap();
        assert_eq!(json["state"], "idle");
    }
}
