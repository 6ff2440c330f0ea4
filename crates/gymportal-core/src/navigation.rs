//! Where the user is, and how code moves them elsewhere.
//!
//! Two kinds of navigation exist. A client-side `push` swaps the visible
//! page and keeps in-memory state. A full `assign` behaves like a page load:
//! the front end drops its state and re-initializes the session before the
//! new page mounts.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Navigations kept in the log; older ones are dropped.
const MAX_LOG_EVENTS: usize = 100;

/// History entries kept for `back`; the oldest are dropped.
const MAX_STACK_DEPTH: usize = 100;

pub trait Navigator: Send + Sync {
    /// Current location, including any query string.
    fn current_path(&self) -> String;

    /// Client-side navigation.
    fn push(&self, path: &str);

    /// Full navigation, treated by the front end as a reload.
    fn assign(&self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    Push,
    Assign,
    Back,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub kind: NavigationKind,
    pub path: String,
}

#[derive(Debug)]
struct HistoryState {
    stack: VecDeque<String>,
    reload_pending: bool,
    log: VecDeque<NavigationEvent>,
}

impl HistoryState {
    fn append(&mut self, kind: NavigationKind, path: &str) {
        if self.log.len() == MAX_LOG_EVENTS {
            self.log.pop_front();
        }
        self.log.push_back(NavigationEvent {
            kind,
            path: path.to_string(),
        });
    }

    fn enter(&mut self, path: &str) {
        if self.stack.back().map(String::as_str) == Some(path) {
            return;
        }
        if self.stack.len() == MAX_STACK_DEPTH {
            self.stack.pop_front();
        }
        self.stack.push_back(path.to_string());
    }
}

/// In-memory browser history used by the terminal front end and by tests.
#[derive(Debug)]
pub struct History {
    state: Mutex<HistoryState>,
}

impl History {
    pub fn new(start: &str) -> Self {
        Self {
            state: Mutex::new(HistoryState {
                stack: VecDeque::from([start.to_string()]),
                reload_pending: false,
                log: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Go back one entry. Returns false when already at the first entry.
    pub fn back(&self) -> bool {
        let mut state = self.lock();
        if state.stack.len() <= 1 {
            return false;
        }
        state.stack.pop_back();
        let path = state.stack.back().cloned().unwrap_or_default();
        state.append(NavigationKind::Back, &path);
        true
    }

    /// Swap the current entry, as a server-side redirect does.
    pub fn replace(&self, path: &str) {
        let mut state = self.lock();
        if let Some(last) = state.stack.back_mut() {
            *last = path.to_string();
        }
        state.append(NavigationKind::Replace, path);
        debug!(path, "Replaced location");
    }

    /// Returns true once after each `assign`, then false until the next one.
    pub fn take_reload(&self) -> bool {
        std::mem::take(&mut self.lock().reload_pending)
    }

    /// The most recent navigations, oldest first.
    pub fn log(&self) -> Vec<NavigationEvent> {
        self.lock().log.iter().cloned().collect()
    }

    /// How many navigations of any kind targeted `path`.
    pub fn count_to(&self, path: &str) -> usize {
        self.lock().log.iter().filter(|e| e.path == path).count()
    }

    fn record(&self, kind: NavigationKind, path: &str) {
        let mut state = self.lock();
        state.enter(path);
        if kind == NavigationKind::Assign {
            state.reload_pending = true;
        }
        state.append(kind, path);
        debug!(path, ?kind, "Navigated");
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for History {
    fn current_path(&self) -> String {
        self.lock().stack.back().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, path: &str) {
        self.record(NavigationKind::Push, path);
    }

    fn assign(&self, path: &str) {
        self.record(NavigationKind::Assign, path);
    }
}

/// Path part of a location, without query string or fragment.
pub fn strip_query(location: &str) -> &str {
    let end = location.find(|c: char| c == '?' || c == '#').unwrap_or(location.len());
    &location[..end]
}
