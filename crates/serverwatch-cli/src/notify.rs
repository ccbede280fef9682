//! Notifier that prints to stderr, keeping stdout for command output.

use serverwatch_core::{NotificationKind, Notifier};

/// Prints each notification as `[kind] message` on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier {
    quiet: bool,
}

impl StderrNotifier {
    /// Create a notifier; a quiet notifier only prints errors.
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for StderrNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        if self.quiet && kind != NotificationKind::Error {
            return;
        }
        eprintln!("[{kind}] {message}");
    }
}
