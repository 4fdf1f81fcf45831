use log::info;

use crate::error::AppResult;

/// Host notification capability.
///
/// Injected so hosts can wire a real notification surface and tests can
/// inject failures. Showing a notification is best-effort: the dispatcher
/// swallows errors, so implementations may fail freely.
pub trait Notifier: Send + Sync {
    /// Ask the host for notification permission if not yet decided. Called
    /// once when the service is constructed.
    fn request_permission(&self) {}

    fn show(&self, title: &str, body: &str) -> AppResult<()>;
}

/// Fallback notifier for hosts without a notification surface: writes the
/// notification to the log instead.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, title: &str, body: &str) -> AppResult<()> {
        info!("{}: {}", title, body);
        Ok(())
    }
}
