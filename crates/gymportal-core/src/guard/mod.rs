//! Route guarding.
//!
//! Both layers consume the rules in [`policy`]:
//! - [`EdgeGuard`]: runs before a page is served; only checks that a session
//!   cookie exists for protected paths
//! - [`PageGuard`]: runs on the mounted page against the session state and is
//!   the only place roles are enforced

pub mod edge;
pub mod page;
pub mod policy;

pub use edge::{session_cookie, EdgeGuard, EdgeOutcome, SESSION_COOKIE};
pub use page::{GuardState, Mount, MountTicket, PageGuard};
pub use policy::{
    decide, landing_for, matches_prefix, Access, Decision, RouteTable, ADMIN_PATH, DASHBOARD_PATH, HOME_PATH,
    LOGIN_PATH,
};
