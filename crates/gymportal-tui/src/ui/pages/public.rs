//! Static marketing pages: home, classes, location, plans.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use gymportal_core::models::PLANS;

use crate::app::{App, HOME_SHORTCUTS};
use crate::ui::styles;
use crate::ui::widgets::{bullet, heading, pair, render_text};

/// Weekly group class timetable: (class, days, time).
const CLASS_SCHEDULE: [(&str, &str, &str); 6] = [
    ("Spinning", "Mon / Wed / Fri", "08:00 - 09:00"),
    ("Yoga", "Tue / Thu", "09:30 - 10:30"),
    ("CrossFit", "Mon to Fri", "19:00 - 20:00"),
    ("Zumba", "Tue / Thu", "18:00 - 19:00"),
    ("Pilates", "Wed / Fri", "10:00 - 11:00"),
    ("Body Pump", "Mon / Wed", "20:00 - 21:00"),
];

const OPENING_HOURS: [(&str, &str); 3] = [
    ("Monday to Friday", "8:00 - 22:00"),
    ("Saturday", "9:00 - 18:00"),
    ("Sunday", "10:00 - 14:00"),
];

pub fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Train like a champion", styles::title_style())),
        Line::from(""),
        Line::from("  Olimpo Gym has the equipment, the coaches and the classes to"),
        Line::from("  take you to your next goal, whatever it is."),
        Line::from(""),
        heading("  Why Olimpo"),
        bullet("Latest-generation weight and cardio equipment"),
        bullet("Certified coaches with ongoing training"),
        bullet("Group classes every day of the week"),
        bullet("Personal plans with progress tracking"),
    ];
    render_text(frame, chunks[0], "Welcome", lines);

    let items: Vec<ListItem> = HOME_SHORTCUTS
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
        .title(" Get started ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let mut state = ListState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(List::new(items).block(block), chunks[1], &mut state);
}

pub fn render_classes(frame: &mut Frame, _app: &App, area: Rect) {
    let mut lines = vec![Line::from(""), heading(format!("  {:<12}{:<18}{}", "Class", "Days", "Time"))];
    for (class, days, time) in CLASS_SCHEDULE {
        lines.push(Line::from(format!("  {:<12}{:<18}{}", class, days, time)));
    }
    lines.push(Line::from(""));
    lines.push(heading("  Our coaches"));
    lines.push(bullet("International certifications"));
    lines.push(bullet("Continuous training"));
    lines.push(bullet("Personal attention in every class"));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Want to try a class? Press g then t to contact us.",
        styles::muted_style(),
    )));
    render_text(frame, area, "Classes", lines);
}

pub fn render_location(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        heading("  Address"),
        Line::from("  Olimpo Gym, Av. Corrientes 1234"),
        Line::from("  Buenos Aires, Argentina (CP 1043)"),
        Line::from(""),
        pair("  WhatsApp", app.config.whatsapp_phone.clone()),
        pair("  Email", "info@olimpogym.com"),
        Line::from(""),
        heading("  Opening hours"),
    ];
    for (days, hours) in OPENING_HOURS {
        lines.push(Line::from(format!("  {:<20}{}", days, hours)));
    }
    lines.push(Line::from(""));
    lines.push(heading("  Getting here"));
    lines.push(bullet("Subway: Line B, Carlos Pellegrini station"));
    lines.push(bullet("Buses: 5, 6, 7, 9, 10, 17, 45, 59, 67, 70"));
    lines.push(bullet("Paid parking in the building"));
    render_text(frame, area, "Location", lines);
}

pub fn render_plans(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let items: Vec<ListItem> = PLANS
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let badge = if plan.is_popular { " ★" } else { "" };
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(format!(" {}{}", plan.name, badge)).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Plans ({}) ", PLANS.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    let mut state = ListState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(List::new(items).block(block), chunks[0], &mut state);

    let Some(plan) = PLANS.get(app.selection) else {
        return;
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", plan.name), styles::title_style())),
        Line::from(format!("  {}", plan.description)),
        Line::from(""),
        pair("  Price", plan.price),
        pair("  Duration", format!("{} days", plan.duration_days)),
        Line::from(""),
        heading("  Includes"),
    ];
    for feature in plan.features {
        lines.push(bullet(*feature));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [Enter] ", styles::help_key_style()),
        Span::styled("Ask about this plan", styles::help_desc_style()),
    ]));

    let detail = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, chunks[1]);
}

pub fn render_not_found(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  Nothing lives at {}", app.location), styles::error_style())),
        Line::from(""),
        Line::from(Span::styled("  Press g then h to go home.", styles::muted_style())),
    ];
    render_text(frame, area, "Not found", lines);
}
