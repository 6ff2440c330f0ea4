//! Back-office pages.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::{App, AppState, ADMIN_LINKS};
use crate::screens::NotificationKind;
use crate::ui::styles;
use crate::ui::widgets::{form_lines, heading, pair, render_form, render_text};
use crate::utils::{format_date, format_price, truncate_string, yes_no};

/// Width of the longest bar in the dashboard charts
const BAR_WIDTH: usize = 30;

fn editing(app: &App) -> bool {
    matches!(app.state, AppState::Editing)
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

pub fn render_menu(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = ADMIN_LINKS
        .iter()
        .enumerate()
        .map(|(i, (label, _))| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(format!(" → {}", label)).style(style)
        })
        .collect();

    let block = Block::default()
        .title(" Admin panel ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let mut state = ListState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

pub fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let mut lines = vec![Line::from("")];
    match &app.stats {
        Some(stats) => {
            let m = &stats.memberships;
            lines.push(heading(" Memberships"));
            lines.push(pair("   Total", m.total.to_string()));
            lines.push(Line::from(vec![
                Span::styled("   Active ", styles::muted_style()),
                Span::styled(m.active.to_string(), styles::success_style()),
                Span::styled("  Expired ", styles::muted_style()),
                Span::styled(m.expired.to_string(), styles::error_style()),
                Span::styled("  Pending ", styles::muted_style()),
                Span::raw(m.pending.to_string()),
            ]));
            for (kind, count) in &m.by_type {
                lines.push(pair(&format!("   {}", kind), count.to_string()));
            }
            lines.push(pair("   Revenue this month", format_price(m.revenue_current_month)));
            lines.push(Line::from(""));

            let a = &stats.attendance;
            lines.push(heading(" Attendance"));
            lines.push(pair("   Today / week / month", format!("{} / {} / {}", a.total_today, a.total_week, a.total_month)));
            lines.push(pair("   Daily average", format!("{:.1}", a.average_per_day)));
            if let Some(peak) = a.peak_hours.iter().max_by_key(|p| p.count) {
                lines.push(pair("   Peak hour", format!("{:02}:00 ({})", peak.hour, peak.count)));
            }
            lines.push(Line::from(""));

            lines.push(heading(" Blog"));
            lines.push(pair("   Posts / views", format!("{} / {}", stats.blog.total_posts, stats.blog.total_views)));
            for post in stats.blog.most_viewed_posts.iter().take(3) {
                lines.push(Line::from(format!("   {} ({})", truncate_string(&post.title, 28), post.views)));
            }
            lines.push(Line::from(""));
            lines.push(pair(
                " New users",
                format!("{} ({:+.0}%)", stats.new_users.count, stats.new_users.percent_change),
            ));
        }
        None if app.is_loading() => lines.push(Line::from(Span::styled(" Loading...", styles::muted_style()))),
        None => lines.push(Line::from(Span::styled(" No statistics", styles::muted_style()))),
    }
    render_text(frame, chunks[0], "Dashboard", lines);

    let mut chart = vec![Line::from(""), heading(" Revenue by month")];
    let max_revenue = app.revenue.iter().map(|r| r.revenue).fold(0.0, f64::max);
    for point in &app.revenue {
        chart.push(Line::from(vec![
            Span::styled(format!(" {:<8}", point.month), styles::muted_style()),
            Span::styled(bar(point.revenue, max_revenue), styles::success_style()),
            Span::raw(format!(" {}", format_price(point.revenue))),
        ]));
    }
    chart.push(Line::from(""));
    chart.push(heading(" Daily attendance"));
    let max_count = app.daily_attendance.iter().map(|d| d.count).max().unwrap_or(0) as f64;
    for day in &app.daily_attendance {
        chart.push(Line::from(vec![
            Span::styled(format!(" {:<11}", format_date(&day.date)), styles::muted_style()),
            Span::styled(bar(day.count as f64, max_count), styles::link_style()),
            Span::raw(format!(" {}", day.count)),
        ]));
    }
    render_text(frame, chunks[1], "Trends", chart);
}

pub fn render_memberships(frame: &mut Frame, app: &App, area: Rect) {
    let memberships = app.filtered_memberships();
    let items: Vec<ListItem> = memberships
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let kind = m.kind().map(|k| k.label()).unwrap_or(m.membership_type.as_str());
            let until = m.end_date.as_deref().map(format_date).unwrap_or_else(|| "-".to_string());
            let row_style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:<24} {:<16} {:<11} ", truncate_string(m.owner_name(), 24), kind, until),
                    row_style,
                ),
                Span::styled(format!("{:<9}", m.status), styles::status_style(&m.status)),
                Span::styled(
                    format!(" {:>10}  auto {}", format_price(m.price), yes_no(m.auto_renew)),
                    row_style,
                ),
            ]))
        })
        .collect();

    let filter = app.status_filter.map(|s| s.label()).unwrap_or("All");
    let block = Block::default()
        .title(format!(" Memberships: {} ({}) ", filter, memberships.len()))
        .title_bottom(Line::from(Span::styled(
            " [c] new  [e] edit  [n] renew  [a] auto-renew  [x] check expired  [f] filter  [/] search ",
            styles::muted_style(),
        )))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let mut state = ListState::default();
    if !memberships.is_empty() {
        state.select(Some(app.selection));
    }
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

pub fn render_membership_form(frame: &mut Frame, app: &App, area: Rect) {
    match &app.editing {
        Some(membership) => {
            let title = format!("Edit membership of {}", membership.owner_name());
            render_form(frame, &app.form, area, &title, editing(app), "save");
        }
        None if app.form.fields.is_empty() => {
            render_text(frame, area, "Membership", vec![Line::from(Span::styled(" Loading...", styles::muted_style()))]);
        }
        None => render_form(frame, &app.form, area, "New membership", editing(app), "create"),
    }
}

pub fn render_notifications(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    let mut tabs = vec![Span::raw(" ")];
    for kind in NotificationKind::ALL {
        tabs.push(Span::styled(
            format!(" {} ", kind.label()),
            styles::nav_style(kind == app.notification_kind),
        ));
    }
    tabs.push(Span::styled("  [t] switch", styles::muted_style()));
    frame.render_widget(Line::from(tabs), rows[0]);

    let bulk = app.notification_kind == NotificationKind::BulkEmail;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    let items: Vec<ListItem> = app
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let marker = if !bulk {
                ""
            } else if app.recipients.contains(&user.email) {
                "[x] "
            } else {
                "[ ] "
            };
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(format!(" {}{}", marker, truncate_string(&user.name, 28))).style(style)
        })
        .collect();

    let title = if bulk {
        format!(" Members ({} selected) ", app.recipients.len())
    } else {
        format!(" Members ({}) ", app.users.len())
    };
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(!editing(app)));
    let mut state = ListState::default();
    if !app.users.is_empty() {
        state.select(Some(app.selection));
    }
    frame.render_stateful_widget(List::new(items).block(block), chunks[0], &mut state);

    let mut lines = form_lines(&app.form, editing(app), "send");
    if let Some(link) = &app.link {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("   WhatsApp link:", styles::success_style())));
        lines.push(Line::from(Span::styled(format!("   {}", link), styles::link_style())));
    }
    if bulk {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "   [Space] on a member adds or removes them",
            styles::muted_style(),
        )));
    }
    render_text(frame, chunks[1], app.notification_kind.label(), lines);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_max() {
        assert_eq!(bar(10.0, 10.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).chars().count(), BAR_WIDTH / 2);
        assert!(bar(3.0, 0.0).is_empty());
    }
}
