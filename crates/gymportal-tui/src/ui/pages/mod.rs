//! Page content, one module per area of the portal.

mod account;
mod admin;
mod blog;
mod public;
mod shop;

use ratatui::{layout::Rect, Frame};

use crate::app::App;
use crate::route::Page;

/// Draw the mounted page. Only called once its guard allows it.
pub fn render_page(frame: &mut Frame, app: &App, area: Rect) {
    match &app.page {
        Page::Home => public::render_home(frame, app, area),
        Page::Classes => public::render_classes(frame, app, area),
        Page::Location => public::render_location(frame, app, area),
        Page::Memberships => public::render_plans(frame, app, area),
        Page::NotFound => public::render_not_found(frame, app, area),
        Page::Blog => blog::render_list(frame, app, area),
        Page::BlogPost(_) => blog::render_post(frame, app, area),
        Page::Shop => shop::render(frame, app, area),
        Page::Login => account::render_login(frame, app, area),
        Page::Contact => account::render_contact(frame, app, area),
        Page::Profile => account::render_profile(frame, app, area),
        Page::Dashboard => account::render_dashboard(frame, app, area),
        Page::Admin => admin::render_menu(frame, app, area),
        Page::AdminDashboard => admin::render_dashboard(frame, app, area),
        Page::AdminMemberships => admin::render_memberships(frame, app, area),
        Page::AdminMembershipCreate | Page::AdminMembershipEdit(_) => admin::render_membership_form(frame, app, area),
        Page::AdminNotifications => admin::render_notifications(frame, app, area),
    }
}
