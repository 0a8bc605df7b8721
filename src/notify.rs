use thiserror::Error;

pub const COMPLETION_SUMMARY: &str = "Time's up!";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("desktop notifications are disabled")]
    Disabled,
    #[error("desktop notifications are not available in this build")]
    Unavailable,
    #[error("notification failed: {0}")]
    Failed(String),
}

/// A channel able to put a notification in front of the user
pub trait Notifier {
    fn notify(&mut self, summary: &str, body: &str) -> Result<(), NotifyError>;
}

/// How a completion signal reached the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Desktop,
    /// Desktop channel refused; the caller must show a blocking alert
    Alert,
}

/// Desktop notifications, compiled in with the `notifications` feature
#[derive(Clone, Copy, Debug)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, summary: &str, body: &str) -> Result<(), NotifyError> {
        if !self.enabled {
            return Err(NotifyError::Disabled);
        }
        show_desktop(summary, body)
    }
}

#[cfg(feature = "notifications")]
fn show_desktop(summary: &str, body: &str) -> Result<(), NotifyError> {
    notify_rust::Notification::new()
        .appname("klok")
        .summary(summary)
        .body(body)
        .show()
        .map(|_| ())
        .map_err(|e| NotifyError::Failed(e.to_string()))
}

#[cfg(not(feature = "notifications"))]
fn show_desktop(_summary: &str, _body: &str) -> Result<(), NotifyError> {
    Err(NotifyError::Unavailable)
}

/// Raise the timer completion signal, degrading to an alert when the
/// desktop channel is unavailable.
pub fn signal_completion(notifier: &mut dyn Notifier, body: &str) -> Delivery {
    match notifier.notify(COMPLETION_SUMMARY, body) {
        Ok(()) => Delivery::Desktop,
        Err(e) => {
            tracing::debug!(error = %e, "falling back to terminal alert");
            Delivery::Alert
        }
    }
}
