use std::sync::Mutex;

use chrono::Utc;

use crate::notification::Notifier;
use crate::types::{Notification, Severity};

/// 표시된 알림을 순서대로 기록
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
    dismissed: Mutex<usize>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.message).collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().pop()
    }

    pub fn dismiss_count(&self) -> usize {
        self.dismissed.lock().map(|d| *d).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(Notification {
                severity,
                message: message.to_string(),
                timestamp: Utc::now(),
            });
        }
    }

    fn dismiss(&self) {
        if let Ok(mut dismissed) = self.dismissed.lock() {
            *dismissed += 1;
        }
    }
}
