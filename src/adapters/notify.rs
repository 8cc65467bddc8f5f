use crate::core::Notifier;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Prints notifications to stderr for terminal users.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn error(&self, message: &str) {
        tracing::debug!("Notifying user: {}", message);
        eprintln!("❌ {}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Keeps every notification in memory, oldest first.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(list) => list.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|notification| notification.message)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn error(&self, message: &str) {
        let notification = Notification {
            message: message.to_string(),
            at: Utc::now(),
        };
        match self.notifications.lock() {
            Ok(mut list) => list.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
