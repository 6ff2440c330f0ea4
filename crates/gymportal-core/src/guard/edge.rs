//! Coarse pre-filter run before a page is served.
//!
//! Only the presence of the session cookie is checked. The cookie is opaque
//! here, so the admin role is NOT verified at the edge: a signed-in member
//! requesting `/admin/...` passes and is turned away by the page guard.

use reqwest::header::{HeaderMap, COOKIE};
use tracing::debug;

use super::policy::{RouteTable, LOGIN_PATH};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "authToken";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeOutcome {
    Continue,
    Redirect(String),
}

#[derive(Debug, Clone, Default)]
pub struct EdgeGuard {
    routes: RouteTable,
}

impl EdgeGuard {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }

    pub fn check(&self, path: &str, session_cookie: Option<&str>) -> EdgeOutcome {
        let has_cookie = session_cookie.is_some_and(|c| !c.trim().is_empty());
        if self.routes.is_protected(path) && !has_cookie {
            debug!(path, "No session cookie on protected path");
            return EdgeOutcome::Redirect(LOGIN_PATH.to_string());
        }
        // TODO: verify the admin role here once the backend issues a token
        // the edge can decode; until then the page guard is the only check.
        EdgeOutcome::Continue
    }

    pub fn check_headers(&self, path: &str, headers: &HeaderMap) -> EdgeOutcome {
        self.check(path, session_cookie(headers).as_deref())
    }
}

/// Value of the session cookie across all `Cookie` headers.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_protected_without_cookie_redirects() {
        let edge = EdgeGuard::default();
        assert_eq!(edge.check("/dashboard", None), EdgeOutcome::Redirect("/login".to_string()));
        assert_eq!(edge.check("/admin/memberships", Some("")), EdgeOutcome::Redirect("/login".to_string()));
        assert_eq!(edge.check("/blog", None), EdgeOutcome::Continue);
    }

    #[test]
    fn test_admin_path_with_any_cookie_continues() {
        let edge = EdgeGuard::default();
        assert_eq!(edge.check("/admin", Some("member-token")), EdgeOutcome::Continue);
    }

    #[test]
    fn test_cookie_parsed_from_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("lang=es; authToken=abc123"));
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc123"));

        let edge = EdgeGuard::default();
        assert_eq!(edge.check_headers("/dashboard", &headers), EdgeOutcome::Continue);
        assert_eq!(
            edge.check_headers("/dashboard", &HeaderMap::new()),
            EdgeOutcome::Redirect("/login".to_string())
        );
    }
}
