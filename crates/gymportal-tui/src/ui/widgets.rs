//! Building blocks shared by several pages.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::form::Form;

use super::styles;

/// Width of the label column in forms
const LABEL_WIDTH: usize = 20;

/// Lines for a form; the focused field gets a cursor while `editing`.
pub fn form_lines(form: &Form, editing: bool, submit_label: &str) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];

    for (i, field) in form.visible() {
        let focused = editing && i == form.focus;
        let marker = if field.required { "*" } else { " " };
        let value_style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>width$}{} ", field.label, marker, width = LABEL_WIDTH),
                styles::muted_style(),
            ),
            Span::styled(format!("{}{}", field.display(), cursor), value_style),
        ]));
    }

    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled("   Sending...", styles::muted_style())));
    } else if editing {
        lines.push(Line::from(vec![
            Span::styled("   [Enter] ", styles::help_key_style()),
            Span::styled(format!("on the last field: {}", submit_label), styles::help_desc_style()),
            Span::styled("   [←/→] choose  [Space] toggle", styles::muted_style()),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled("   [Enter] ", styles::help_key_style()),
            Span::styled("fill in the form", styles::help_desc_style()),
        ]));
    }

    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("   {}", error), styles::error_style())));
    }
    lines
}

pub fn render_form(frame: &mut Frame, form: &Form, area: Rect, title: &str, editing: bool, submit_label: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(editing));

    let paragraph = Paragraph::new(form_lines(form, editing, submit_label))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// A bordered block of prose.
pub fn render_text(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

pub fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), styles::highlight_style()))
}

pub fn bullet(text: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled("  • ", styles::muted_style()),
        Span::raw(text.into()),
    ])
}

/// `label: value` on one line.
pub fn pair(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), styles::muted_style()),
        Span::raw(value.into()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Field;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_form_lines_mask_secrets_and_show_errors() {
        let mut form = Form::new(vec![
            Field::text("email", "Email").required().with_text("ana@olimpo.gym"),
            Field::secret("password", "Password").with_text("abc"),
        ]);
        form.error = Some("Invalid login credentials".to_string());

        let lines: Vec<String> = form_lines(&form, true, "sign in").iter().map(text_of).collect();
        assert!(lines.iter().any(|l| l.contains("Email*") && l.contains("ana@olimpo.gym▌")));
        assert!(lines.iter().any(|l| l.contains("***") && !l.contains("abc")));
        assert!(lines.iter().any(|l| l.contains("Invalid login credentials")));
    }

    #[test]
    fn test_form_lines_hide_hidden_fields() {
        let mut form = Form::new(vec![Field::text("a", "Alpha"), Field::text("b", "Beta")]);
        form.set_hidden("b", true);
        let lines: Vec<String> = form_lines(&form, false, "save").iter().map(text_of).collect();
        assert!(!lines.iter().any(|l| l.contains("Beta")));
    }
}
