use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::{Instant, Schedule};
use crate::transient::{EntityId, TransientBody, TransientTimer, TransientUi};

/// Visual flavour of a toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
        }
    }

    /// Bootstrap icon name shown next to the message.
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info-circle",
            NotificationKind::Success => "check-circle",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            NotificationKind::Info => "#17a2b8",
            NotificationKind::Success => "#28a745",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub message: String,
    #[serde(default)]
    pub kind: NotificationKind,
}

impl NotificationMessage {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl TransientUi {
    /// Shows a toast that dismisses itself after the configured lifetime
    /// unless its close control is used first.
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: Instant,
        timers: &mut impl Schedule<TransientTimer>,
    ) -> EntityId {
        let notification = NotificationMessage::new(message, kind);
        info!(kind = kind.as_str(), message = %notification.message, "notify");
        self.insert(TransientBody::Notification(notification), true, now, timers)
    }
}
