//! Route access rules shared by the edge and page guards.

use serde::{Deserialize, Serialize};

use crate::auth::AuthSnapshot;
use crate::navigation::strip_query;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ADMIN_PATH: &str = "/admin";

/// Where a signed-in user lands after login or when bounced off a page.
pub fn landing_for(is_admin: bool) -> &'static str {
    if is_admin {
        ADMIN_PATH
    } else {
        DASHBOARD_PATH
    }
}

/// Segment-aware prefix match: `/admin` covers `/admin` and `/admin/x`,
/// not `/administrator`. The root prefix `/` only matches `/` itself.
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    let path = strip_query(path);
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path == HOME_PATH;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    GuestOnly,
    Member,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Session state is still loading.
    Pending,
    Allow,
    Redirect(String),
}

/// Which paths need a session, which need an admin, and which never
/// trigger a login redirect when the API rejects the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    pub protected_prefixes: Vec<String>,
    pub admin_prefixes: Vec<String>,
    pub guest_only: Vec<String>,
    pub public_paths: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        let own = |paths: &[&str]| paths.iter().map(|p| p.to_string()).collect();
        Self {
            protected_prefixes: own(&[DASHBOARD_PATH, ADMIN_PATH]),
            admin_prefixes: own(&[ADMIN_PATH]),
            guest_only: own(&[LOGIN_PATH]),
            public_paths: own(&[
                HOME_PATH,
                LOGIN_PATH,
                "/register",
                "/contact",
                "/location",
                "/memberships",
            ]),
        }
    }
}

impl RouteTable {
    fn any_match(prefixes: &[String], path: &str) -> bool {
        prefixes.iter().any(|p| matches_prefix(path, p))
    }

    pub fn is_protected(&self, path: &str) -> bool {
        Self::any_match(&self.protected_prefixes, path)
    }

    pub fn requires_admin(&self, path: &str) -> bool {
        Self::any_match(&self.admin_prefixes, path)
    }

    /// On the 401 allow-list: an expired session does not bounce the user.
    pub fn is_public(&self, path: &str) -> bool {
        Self::any_match(&self.public_paths, path)
    }

    pub fn access_for(&self, path: &str) -> Access {
        if self.requires_admin(path) {
            Access::Admin
        } else if self.is_protected(path) {
            Access::Member
        } else if Self::any_match(&self.guest_only, path) {
            Access::GuestOnly
        } else {
            Access::Public
        }
    }
}

/// The single authoritative access decision.
pub fn decide(access: Access, session: &AuthSnapshot) -> Decision {
    if session.loading {
        return Decision::Pending;
    }
    let signed_in = session.is_authenticated && session.user.is_some();
    match access {
        Access::Public => Decision::Allow,
        Access::GuestOnly if signed_in => Decision::Redirect(landing_for(session.is_admin).to_string()),
        Access::GuestOnly => Decision::Allow,
        Access::Member | Access::Admin if !signed_in => Decision::Redirect(LOGIN_PATH.to_string()),
        Access::Admin if !session.is_admin => Decision::Redirect(DASHBOARD_PATH.to_string()),
        Access::Member | Access::Admin => Decision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use chrono::Utc;

    fn user(is_admin: bool) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            email: "ana@olimpo.gym".to_string(),
            full_name: None,
            phone: String::new(),
            is_admin,
            membership_status: None,
            membership_type: None,
            membership_expiry: None,
            membership_start: None,
            membership_end: None,
            emergency_contact: None,
            birth_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_prefix_is_segment_aware() {
        assert!(matches_prefix("/admin", "/admin"));
        assert!(matches_prefix("/admin/memberships", "/admin"));
        assert!(matches_prefix("/admin?tab=1", "/admin"));
        assert!(!matches_prefix("/administrator", "/admin"));
        assert!(matches_prefix("/", "/"));
        assert!(!matches_prefix("/blog", "/"));
    }

    #[test]
    fn test_access_for_defaults() {
        let routes = RouteTable::default();
        assert_eq!(routes.access_for("/"), Access::Public);
        assert_eq!(routes.access_for("/blog/3"), Access::Public);
        assert_eq!(routes.access_for("/login"), Access::GuestOnly);
        assert_eq!(routes.access_for("/dashboard/profile"), Access::Member);
        assert_eq!(routes.access_for("/admin/memberships/edit/9"), Access::Admin);
    }

    #[test]
    fn test_public_allow_list() {
        let routes = RouteTable::default();
        assert!(routes.is_public("/"));
        assert!(routes.is_public("/contact?message=hi"));
        assert!(routes.is_public("/memberships"));
        assert!(!routes.is_public("/blog"));
        assert!(!routes.is_public("/dashboard"));
    }

    #[test]
    fn test_decide_pending_while_loading() {
        let snapshot = AuthSnapshot::default();
        assert!(snapshot.loading);
        assert_eq!(decide(Access::Admin, &snapshot), Decision::Pending);
        assert_eq!(decide(Access::Public, &snapshot), Decision::Pending);
    }

    #[test]
    fn test_decide_redirects() {
        let anonymous = AuthSnapshot::signed_out();
        assert_eq!(decide(Access::Member, &anonymous), Decision::Redirect(LOGIN_PATH.to_string()));
        assert_eq!(decide(Access::Admin, &anonymous), Decision::Redirect(LOGIN_PATH.to_string()));
        assert_eq!(decide(Access::GuestOnly, &anonymous), Decision::Allow);

        let member = AuthSnapshot::signed_in(user(false));
        assert_eq!(decide(Access::Member, &member), Decision::Allow);
        assert_eq!(decide(Access::Admin, &member), Decision::Redirect(DASHBOARD_PATH.to_string()));
        assert_eq!(decide(Access::GuestOnly, &member), Decision::Redirect(DASHBOARD_PATH.to_string()));

        let admin = AuthSnapshot::signed_in(user(true));
        assert_eq!(decide(Access::Admin, &admin), Decision::Allow);
        assert_eq!(decide(Access::GuestOnly, &admin), Decision::Redirect(ADMIN_PATH.to_string()));
    }
}
