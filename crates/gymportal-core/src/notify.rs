//! Toast notifications.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Older toasts are dropped once the queue grows past this.
const MAX_TOASTS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: ToastKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(ToastKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(ToastKind::Error, message);
    }

    fn info(&self, message: &str) {
        self.notify(ToastKind::Info, message);
    }
}

/// Bounded queue of toasts, newest last.
#[derive(Debug, Default)]
pub struct Toasts {
    queue: Mutex<VecDeque<Toast>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Most recent toast still younger than `ttl`.
    pub fn current(&self, ttl: Duration) -> Option<Toast> {
        let cutoff = Utc::now() - ttl;
        self.lock().back().filter(|t| t.at >= cutoff).cloned()
    }

    pub fn latest(&self) -> Option<Toast> {
        self.lock().back().cloned()
    }

    pub fn all(&self) -> Vec<Toast> {
        self.lock().iter().cloned().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|t| t.message.clone()).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Notifier for Toasts {
    fn notify(&self, kind: ToastKind, message: &str) {
        let mut queue = self.lock();
        if queue.len() == MAX_TOASTS {
            queue.pop_front();
        }
        queue.push_back(Toast {
            kind,
            message: message.to_string(),
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_keep_order_and_bound() {
        let toasts = Toasts::new();
        for i in 0..25 {
            toasts.info(&format!("toast {}", i));
        }
        let messages = toasts.messages();
        assert_eq!(messages.len(), MAX_TOASTS);
        assert_eq!(messages[0], "toast 5");
        assert_eq!(toasts.latest().map(|t| t.message), Some("toast 24".to_string()));
    }

    #[test]
    fn test_current_respects_ttl() {
        let toasts = Toasts::new();
        toasts.error("Could not load");
        let current = toasts.current(Duration::seconds(5)).expect("fresh toast");
        assert_eq!(current.kind, ToastKind::Error);
        assert!(toasts.current(Duration::seconds(-1)).is_none());
    }
}
