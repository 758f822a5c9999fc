//! Blocking user-facing alerts.
//!
//! Account-state rejections (suspended, blocked) must reach the user even
//! when log output is filtered away, so they go through this seam instead of
//! the tracing stack.

pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes alerts to stderr, the terminal stand-in for a blocking dialog.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}
