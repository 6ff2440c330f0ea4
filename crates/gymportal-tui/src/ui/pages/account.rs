//! Sign-in, contact, profile and the member dashboard.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use gymportal_core::models::Membership;

use crate::app::{App, AppState};
use crate::ui::styles;
use crate::ui::widgets::{form_lines, pair, render_form, render_text};
use crate::utils::{format_date, format_optional, format_phone, format_price, yes_no};

fn editing(app: &App) -> bool {
    matches!(app.state, AppState::Editing)
}

pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width.min(70);
    let centered = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height.min(14));
    render_form(frame, &app.form, centered, "Sign in", editing(app), "sign in");
}

pub fn render_contact(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = form_lines(&app.form, editing(app), "build the WhatsApp message");
    if let Some(link) = &app.link {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "   Open this link to send your message:",
            styles::success_style(),
        )));
        lines.push(Line::from(Span::styled(format!("   {}", link), styles::link_style())));
    }

    let block = Block::default()
        .title(" Contact us ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(editing(app)));
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

pub fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    render_form(frame, &app.form, area, "My profile", editing(app), "save changes");
}

pub fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let snapshot = app.session.snapshot();
    let mut lines = vec![Line::from("")];
    if let Some(user) = &snapshot.user {
        lines.push(Line::from(Span::styled(
            format!(" Welcome, {}", user.display_name()),
            styles::title_style(),
        )));
        lines.push(Line::from(""));
        lines.push(pair(" Email", user.email.clone()));
        lines.push(pair(" Phone", format_phone(&user.phone)));
        lines.push(pair(" Emergency contact", format_optional(&user.emergency_contact, "-")));
        lines.push(pair(
            " Birth date",
            user.birth_date.as_deref().map(format_date).unwrap_or_else(|| "-".to_string()),
        ));
        lines.push(pair(" Member since", user.created_at.format("%d/%m/%Y").to_string()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [p] ", styles::help_key_style()),
        Span::styled("edit profile", styles::help_desc_style()),
    ]));
    if snapshot.is_admin {
        lines.push(Line::from(vec![
            Span::styled(" [a] ", styles::help_key_style()),
            Span::styled("admin panel", styles::help_desc_style()),
        ]));
    }
    render_text(frame, chunks[0], "My account", lines);

    let items: Vec<ListItem> = if app.my_memberships.is_empty() {
        let message = if app.is_loading() {
            " Loading memberships..."
        } else {
            " No memberships yet. Ask at the front desk."
        };
        vec![ListItem::new(Span::styled(message, styles::muted_style()))]
    } else {
        app.my_memberships.iter().map(membership_item).collect()
    };

    let block = Block::default()
        .title(format!(" My memberships ({}) ", app.my_memberships.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(List::new(items).block(block), chunks[1]);
}

fn membership_item(membership: &Membership) -> ListItem<'static> {
    let kind = membership
        .kind()
        .map(|k| k.label().to_string())
        .unwrap_or_else(|| membership.membership_type.clone());
    let until = membership.end_date.as_deref().map(format_date).unwrap_or_else(|| "-".to_string());
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(format!(" {:<16}", kind), styles::list_item_style()),
            Span::styled(membership.status.clone(), styles::status_style(&membership.status)),
        ]),
        Line::from(Span::styled(
            format!(
                "   {} to {} · {} · auto-renew {}",
                format_date(&membership.start_date),
                until,
                format_price(membership.price),
                yes_no(membership.auto_renew)
            ),
            styles::muted_style(),
        )),
    ])
}
