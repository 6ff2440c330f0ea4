//! Mapping between locations and pages.

use gymportal_core::navigation::strip_query;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Classes,
    Blog,
    BlogPost(String),
    Shop,
    Memberships,
    Location,
    Contact,
    Login,
    Dashboard,
    Profile,
    Admin,
    AdminDashboard,
    AdminMemberships,
    AdminMembershipCreate,
    AdminMembershipEdit(String),
    AdminNotifications,
    NotFound,
}

impl Page {
    pub fn from_path(location: &str) -> Self {
        let path = strip_query(location);
        let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Page::Home,
            ["classes"] => Page::Classes,
            ["blog"] => Page::Blog,
            ["blog", id] => Page::BlogPost((*id).to_string()),
            ["shop"] => Page::Shop,
            ["memberships"] => Page::Memberships,
            ["location"] => Page::Location,
            ["contact"] => Page::Contact,
            ["login"] => Page::Login,
            ["dashboard"] => Page::Dashboard,
            ["dashboard", "profile"] => Page::Profile,
            ["admin"] => Page::Admin,
            ["admin", "dashboard"] => Page::AdminDashboard,
            ["admin", "memberships"] => Page::AdminMemberships,
            ["admin", "memberships", "create"] => Page::AdminMembershipCreate,
            ["admin", "memberships", "edit", id] => Page::AdminMembershipEdit((*id).to_string()),
            ["admin", "notifications"] => Page::AdminNotifications,
            _ => Page::NotFound,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Classes => "Classes",
            Page::Blog | Page::BlogPost(_) => "Blog",
            Page::Shop => "Shop",
            Page::Memberships => "Memberships",
            Page::Location => "Location",
            Page::Contact => "Contact",
            Page::Login => "Sign in",
            Page::Dashboard => "My dashboard",
            Page::Profile => "Edit profile",
            Page::Admin => "Admin",
            Page::AdminDashboard => "Admin dashboard",
            Page::AdminMemberships => "Memberships",
            Page::AdminMembershipCreate => "New membership",
            Page::AdminMembershipEdit(_) => "Edit membership",
            Page::AdminNotifications => "Notifications",
            Page::NotFound => "Not found",
        }
    }

    /// Pages whose main content is a form that takes the keyboard.
    pub fn has_form(&self) -> bool {
        matches!(
            self,
            Page::Login
                | Page::Contact
                | Page::Profile
                | Page::AdminMembershipCreate
                | Page::AdminMembershipEdit(_)
                | Page::AdminNotifications
        )
    }
}

/// A destination in the `g` menu.
pub struct NavLink {
    pub key: char,
    pub label: &'static str,
    pub path: &'static str,
}

pub const NAV_LINKS: [NavLink; 9] = [
    NavLink { key: 'h', label: "Home", path: "/" },
    NavLink { key: 'c', label: "Classes", path: "/classes" },
    NavLink { key: 'b', label: "Blog", path: "/blog" },
    NavLink { key: 's', label: "Shop", path: "/shop" },
    NavLink { key: 'm', label: "Memberships", path: "/memberships" },
    NavLink { key: 'l', label: "Location", path: "/location" },
    NavLink { key: 't', label: "Contact", path: "/contact" },
    NavLink { key: 'd', label: "Dashboard", path: "/dashboard" },
    NavLink { key: 'a', label: "Admin", path: "/admin" },
];

pub fn nav_link(key: char) -> Option<&'static NavLink> {
    NAV_LINKS.iter().find(|link| link.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Page::from_path("/"), Page::Home);
        assert_eq!(Page::from_path("/blog/42"), Page::BlogPost("42".to_string()));
        assert_eq!(Page::from_path("/contact?message=hola"), Page::Contact);
        assert_eq!(Page::from_path("/dashboard/"), Page::Dashboard);
        assert_eq!(Page::from_path("/dashboard/profile"), Page::Profile);
        assert_eq!(
            Page::from_path("/admin/memberships/edit/m-1"),
            Page::AdminMembershipEdit("m-1".to_string())
        );
        assert_eq!(Page::from_path("/admin/memberships/create"), Page::AdminMembershipCreate);
        assert_eq!(Page::from_path("/register"), Page::NotFound);
    }

    #[test]
    fn test_nav_links_have_unique_keys() {
        for link in &NAV_LINKS {
            assert_eq!(NAV_LINKS.iter().filter(|l| l.key == link.key).count(), 1);
            assert_ne!(Page::from_path(link.path), Page::NotFound);
        }
        assert_eq!(nav_link('b').map(|l| l.path), Some("/blog"));
        assert!(nav_link('z').is_none());
    }
}
