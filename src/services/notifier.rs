// src/services/notifier.rs
//! Notification collaborator.
//!
//! The flow controller surfaces every user-visible condition through this
//! fire-and-forget seam; how notices are rendered (toasts on the original
//! site) is outside the subsystem. The production implementation routes
//! through the `log` facade.

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Fire-and-forget notification sink; no return value is consumed.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NoticeLevel);
}

/// Notifier that writes notices to the application log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, level: NoticeLevel) {
        match level {
            NoticeLevel::Info | NoticeLevel::Success => {
                log::info!(target: "notifications", "{}", message)
            }
            NoticeLevel::Warning => log::warn!(target: "notifications", "{}", message),
            NoticeLevel::Error => log::error!(target: "notifications", "{}", message),
        }
    }
}
