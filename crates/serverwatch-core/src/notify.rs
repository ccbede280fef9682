//! Outbound notification seam.
//!
//! The projector reports one notification per finished action: the backend
//! message on success, the normalised error text on failure.

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info, warn};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral outcome (loads, pings, filters).
    Default,
    /// Successful mutation (save, delete).
    Success,
    /// Informational (report export).
    Info,
    /// Warning.
    Warning,
    /// Failed action.
    Error,
}

impl NotificationKind {
    /// Lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    fn notify(&self, kind: NotificationKind, message: &str);

    /// Shorthand for [`NotificationKind::Default`].
    fn on_default(&self, message: &str) {
        self.notify(NotificationKind::Default, message);
    }

    /// Shorthand for [`NotificationKind::Success`].
    fn on_success(&self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    /// Shorthand for [`NotificationKind::Info`].
    fn on_info(&self, message: &str) {
        self.notify(NotificationKind::Info, message);
    }

    /// Shorthand for [`NotificationKind::Warning`].
    fn on_warning(&self, message: &str) {
        self.notify(NotificationKind::Warning, message);
    }

    /// Shorthand for [`NotificationKind::Error`].
    fn on_error(&self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }
}

/// Notifier that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Error => error!(target: "serverwatch::notify", %kind, "{message}"),
            NotificationKind::Warning => warn!(target: "serverwatch::notify", %kind, "{message}"),
            _ => info!(target: "serverwatch::notify", %kind, "{message}"),
        }
    }
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Text shown to the operator.
    pub message: String,
}

/// Notifier that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, oldest first.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().clone()
    }

    /// The most recent notification.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.delivered.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.delivered.lock().push(Notification {
            kind,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.on_default("loaded");
        notifier.on_error("An Error occurred - Error code: 500");

        let delivered = notifier.delivered();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].kind, NotificationKind::Default);
        assert_eq!(
            notifier.last(),
            Some(Notification {
                kind: NotificationKind::Error,
                message: "An Error occurred - Error code: 500".into(),
            })
        );
    }

    #[test]
    fn shorthands_map_to_kinds() {
        let notifier = RecordingNotifier::new();
        notifier.on_success("a");
        notifier.on_info("b");
        notifier.on_warning("c");

        let kinds: Vec<_> = notifier.delivered().into_iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::Success, NotificationKind::Info, NotificationKind::Warning]
        );
    }

    #[test]
    fn kind_display() {
        assert_eq!(NotificationKind::Default.to_string(), "default");
        assert_eq!(NotificationKind::Error.to_string(), "error");
    }
}
