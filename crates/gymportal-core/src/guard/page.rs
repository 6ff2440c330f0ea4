//! Per-page guard and mount bookkeeping.

use tracing::info;

use super::policy::{decide, Access, Decision, RouteTable};
use crate::auth::AuthSnapshot;
use crate::navigation::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Denied,
    Allowed,
}

/// Decides whether a mounted page may show its content.
///
/// Starts in `Checking` and settles once on `Denied` or `Allowed`. The
/// redirect is issued on the transition into `Denied`, so it happens once
/// per mount no matter how often the guard is re-evaluated.
#[derive(Debug, Clone)]
pub struct PageGuard {
    access: Access,
    state: GuardState,
    redirected_to: Option<String>,
}

impl PageGuard {
    pub fn new(access: Access) -> Self {
        Self {
            access,
            state: GuardState::Checking,
            redirected_to: None,
        }
    }

    pub fn for_path(routes: &RouteTable, path: &str) -> Self {
        Self::new(routes.access_for(path))
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Protected content is drawn only in this state.
    pub fn can_render(&self) -> bool {
        self.state == GuardState::Allowed
    }

    pub fn redirected_to(&self) -> Option<&str> {
        self.redirected_to.as_deref()
    }

    /// Re-run the policy against the latest session state.
    pub fn evaluate(&mut self, session: &AuthSnapshot, navigator: &dyn Navigator) -> GuardState {
        if self.state != GuardState::Checking {
            return self.state;
        }
        match decide(self.access, session) {
            Decision::Pending => {}
            Decision::Allow => self.state = GuardState::Allowed,
            Decision::Redirect(path) => {
                info!(from = %navigator.current_path(), to = %path, "Page guard redirect");
                self.state = GuardState::Denied;
                navigator.push(&path);
                self.redirected_to = Some(path);
            }
        }
        self.state
    }
}

/// Identifies the mount an async request was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountTicket(u64);

/// Tracks which page instance is currently mounted so late responses can
/// be told apart from current ones.
#[derive(Debug, Default)]
pub struct Mount {
    epoch: u64,
    mounted: bool,
}

impl Mount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self) -> MountTicket {
        self.epoch += 1;
        self.mounted = true;
        MountTicket(self.epoch)
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Ticket for requests issued by the current mount.
    pub fn ticket(&self) -> Option<MountTicket> {
        self.mounted.then_some(MountTicket(self.epoch))
    }

    /// Whether a result carrying `ticket` may still update the page.
    pub fn accepts(&self, ticket: MountTicket) -> bool {
        self.mounted && ticket.0 == self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::History;

    #[test]
    fn test_checking_until_loaded_then_denied_once() {
        let history = History::new("/dashboard");
        let mut guard = PageGuard::new(Access::Member);

        assert_eq!(guard.evaluate(&AuthSnapshot::default(), &history), GuardState::Checking);
        assert!(!guard.can_render());

        let anonymous = AuthSnapshot::signed_out();
        assert_eq!(guard.evaluate(&anonymous, &history), GuardState::Denied);
        assert_eq!(guard.evaluate(&anonymous, &history), GuardState::Denied);
        assert_eq!(history.count_to("/login"), 1);
        assert_eq!(history.current_path(), "/login");
        assert_eq!(guard.redirected_to(), Some("/login"));
        assert!(!guard.can_render());
    }

    #[test]
    fn test_public_page_allowed_after_load() {
        let history = History::new("/blog");
        let mut guard = PageGuard::new(Access::Public);
        assert_eq!(guard.evaluate(&AuthSnapshot::signed_out(), &history), GuardState::Allowed);
        assert!(guard.can_render());
        assert!(history.log().is_empty());
    }

    #[test]
    fn test_mount_rejects_stale_tickets() {
        let mut mount = Mount::new();
        assert!(mount.ticket().is_none());

        let first = mount.mount();
        assert!(mount.accepts(first));

        mount.unmount();
        assert!(!mount.accepts(first));

        let second = mount.mount();
        assert!(!mount.accepts(first));
        assert!(mount.accepts(second));
        assert_eq!(mount.ticket(), Some(second));
    }
}
