//! Notification sink for user-facing cart messages.
//!
//! The engine only ever emits error-level notifications, one per failed
//! operation. Delivery is fire-and-forget: sinks never report back.

use tokio::sync::mpsc;

/// User-facing message texts.
pub mod messages {
    /// The requested amount exceeds available stock.
    pub const OUT_OF_STOCK: &str = "Requested quantity is out of stock";

    /// Adding a product failed.
    pub const ADD_FAILED: &str = "Failed to add product";

    /// Removing a product failed.
    pub const REMOVE_FAILED: &str = "Failed to remove product";

    /// Changing a product's quantity failed.
    pub const UPDATE_FAILED: &str = "Failed to change product quantity";
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Error,
}

/// A message destined for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    /// Create an error-level notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives notifications for display.
pub trait Notifier: Send + Sync {
    /// Deliver a notification. Must not block.
    fn notify(&self, notification: Notification);
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                tracing::error!(target: "rocketshoes::notify", "{}", notification.message);
            }
        }
    }
}

/// Forwards notifications into an unbounded channel.
///
/// A dropped receiver silently discards further notifications.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }
}
