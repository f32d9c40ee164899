use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Toast element ids are this prefix plus the notification id.
pub const TOAST_ID_PREFIX: &str = "operatoros-toast-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Lenient parse for values handed in from page scripts; anything
    /// unrecognised is shown as info.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "warning" => Self::Warning,
            "danger" | "error" => Self::Danger,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    #[serde(skip)]
    pub ttl: Duration,
}

impl Notification {
    #[must_use]
    pub fn class_name(&self) -> String {
        format!(
            "alert alert-{} alert-dismissible fade show notification-toast",
            self.severity
        )
    }

    #[must_use]
    pub fn element_id(&self) -> String {
        format!("{TOAST_ID_PREFIX}{}", self.id)
    }
}

/// Tracks which toasts are still on screen.
///
/// A toast leaves the live set either through user dismissal or its expiry
/// timer; whichever comes second is a no-op.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    ttl: Duration,
    next_id: u64,
    live: BTreeSet<u64>,
}

impl NotificationCenter {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            live: BTreeSet::new(),
        }
    }

    pub fn show(&mut self, message: impl Into<String>, severity: Severity) -> Notification {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.live.insert(id);
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            ttl: self.ttl,
        };
        tracing::debug!(
            id,
            severity = %notification.severity,
            message = %notification.message,
            "notification shown"
        );
        notification
    }

    /// Returns `true` when the toast was still live.
    pub fn dismiss(&mut self, id: u64) -> bool {
        self.live.remove(&id)
    }

    /// Timer path; identical to [`Self::dismiss`] but logged separately.
    pub fn expire(&mut self, id: u64) -> bool {
        let was_live = self.live.remove(&id);
        if !was_live {
            tracing::debug!(id, "notification already dismissed before expiry");
        }
        was_live
    }

    #[must_use]
    pub fn is_live(&self, id: u64) -> bool {
        self.live.contains(&id)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_TOAST_TTL_MS))
    }
}
