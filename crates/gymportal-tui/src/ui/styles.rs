use ratatui::style::{Color, Modifier, Style};

use gymportal_core::notify::ToastKind;

// Olimpo palette: gold on charcoal
pub const PRIMARY: Color = Color::Rgb(230, 170, 40);
pub const SECONDARY: Color = Color::Rgb(96, 176, 96);
pub const ACCENT: Color = Color::Rgb(120, 170, 230);
pub const ERROR: Color = Color::Rgb(208, 72, 72);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(56, 48, 32);

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn link_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::UNDERLINED)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn nav_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn search_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 30, 28)).fg(Color::White)
}

pub fn toast_style(kind: ToastKind) -> Style {
    match kind {
        ToastKind::Success => success_style().add_modifier(Modifier::BOLD),
        ToastKind::Error => error_style().add_modifier(Modifier::BOLD),
        ToastKind::Info => Style::default().fg(ACCENT),
    }
}

pub fn status_style(status: &str) -> Style {
    match status {
        "ACTIVE" => success_style(),
        "EXPIRED" => error_style(),
        _ => highlight_style(),
    }
}

pub fn help_key_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}
