use chrono::Duration;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use gymportal_core::guard::{matches_prefix, GuardState};
use gymportal_core::navigation::strip_query;

use crate::app::{App, AppState, TOAST_TTL_SECS};
use crate::route::NAV_LINKS;

use super::pages;
use super::styles;

const LOGO: [&str; 3] = [
    "   ╔═╗╦  ╦╔╦╗╔═╗╔═╗   ╔═╗╦ ╦╔╦╗",
    "   ║ ║║  ║║║║╠═╝║ ║   ║ ╦╚╦╝║║║",
    "   ╚═╝╩═╝╩╩ ╩╩  ╚═╝   ╚═╝ ╩ ╩ ╩",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Page
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav_bar(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ShowingMenu => render_menu_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Olimpo Gym";
    let snapshot = app.session.snapshot();
    let who = match &snapshot.user {
        Some(user) if snapshot.is_admin => format!("{} (admin)  [o] Sign out", user.display_name()),
        Some(user) => format!("{}  [o] Sign out", user.display_name()),
        None if snapshot.loading => "...".to_string(),
        None => "[l] Sign in".to_string(),
    };
    let right = format!("{}   [?] Help", who);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + right.chars().count() + 2),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_nav_bar(frame: &mut Frame, app: &App, area: Rect) {
    let current = strip_query(&app.location);
    let mut spans = vec![Span::raw(" ")];
    for (i, link) in NAV_LINKS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let selected = if link.path == "/" {
            current == "/"
        } else {
            matches_prefix(current, link.path)
        };
        spans.push(Span::styled(link.label, styles::nav_style(selected)));
    }
    spans.push(Span::styled(format!("   {}", app.location), styles::muted_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.guard.state() {
        GuardState::Allowed => pages::render_page(frame, app, area),
        GuardState::Checking => render_placeholder(frame, area, "Checking your session..."),
        GuardState::Denied => render_placeholder(frame, area, "Redirecting..."),
    }
}

/// Shown instead of the page while the guard has not allowed it.
fn render_placeholder(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let lines = vec![Line::from(""), Line::from(Span::styled(format!("  {}", message), styles::muted_style()))];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left = if let Some(toast) = app.toasts.current(Duration::seconds(TOAST_TTL_SECS)) {
        Span::styled(format!(" {} ", toast.message), styles::toast_style(toast.kind))
    } else if app.is_loading() {
        Span::styled(" Loading... ", styles::muted_style())
    } else if matches!(app.state, AppState::Searching) {
        Span::styled(format!(" Search: {}▌", app.search_query), styles::search_style())
    } else if matches!(app.state, AppState::Editing) {
        Span::styled(" Editing: Tab next field, Enter submit, Esc done ", styles::muted_style())
    } else {
        Span::styled(format!(" {} ", app.page.title()), styles::muted_style())
    };

    let right_text = " [g]o | [Esc] back | [r]efresh | [q]uit ";
    let width = area.width as usize;
    let padding = width
        .saturating_sub(left.content.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        left,
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(styles::status_bar_style()), area);
}

fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect()
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 30, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(Span::styled(
        format!("              version {}", env!("CARGO_PKG_VERSION")),
        styles::muted_style(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Navigation", styles::highlight_style())));
    lines.push(help_line("g + key", "Go to a page"));
    lines.push(help_line("↑/↓ j/k", "Move through lists"));
    lines.push(help_line("Enter", "Open / choose / edit form"));
    lines.push(help_line("Esc", "Back"));
    lines.push(help_line("/", "Search (blog, shop, memberships)"));
    lines.push(help_line("r", "Reload the page"));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Account", styles::highlight_style())));
    lines.push(help_line("l", "Sign in"));
    lines.push(help_line("o", "Sign out"));
    lines.push(help_line("p / a", "Profile / admin (dashboard)"));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Pages", styles::highlight_style())));
    lines.push(help_line("c", "Cycle category (blog, shop)"));
    lines.push(help_line("a x X", "Cart: add, remove, empty"));
    lines.push(help_line("f n a", "Memberships: filter, renew, auto"));
    lines.push(help_line("c e x", "Memberships: new, edit, expire"));
    lines.push(help_line("t Space", "Notifications: kind, recipient"));
    lines.push(Line::from(""));
    lines.push(help_line("q", "Quit"));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_menu_overlay(frame: &mut Frame, app: &App) {
    let height = NAV_LINKS.len() as u16 + 4;
    let area = centered_rect_fixed(32, height, frame.area());
    frame.render_widget(Clear, area);

    let signed_in = app.session.is_authenticated();
    let is_admin = app.session.is_admin();
    let mut lines = vec![Line::from("")];
    for link in &NAV_LINKS {
        let style = match link.path {
            "/dashboard" if !signed_in => styles::muted_style(),
            "/admin" if !is_admin => styles::muted_style(),
            _ => styles::help_desc_style(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("   [{}] ", link.key), styles::help_key_style()),
            Span::styled(link.label, style),
        ]));
    }

    let block = Block::default()
        .title(" Go to ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("   Leave the portal?", styles::highlight_style())));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(" to quit, ", styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to cancel", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
