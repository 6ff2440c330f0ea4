use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::ui::widgets::render_text;
use crate::utils::{format_date, format_optional, truncate_string};

pub fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let posts = app.filtered_posts();
    let width = chunks[0].width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(format!(" {}", truncate_string(&post.title, width))).style(style)
        })
        .collect();

    let category = app.blog_category.as_deref().unwrap_or("All");
    let block = Block::default()
        .title(format!(" Blog: {} ({}) ", category, posts.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let mut state = ListState::default();
    if !posts.is_empty() {
        state.select(Some(app.selection));
    }
    frame.render_stateful_widget(List::new(items).block(block), chunks[0], &mut state);

    let lines = match posts.get(app.selection) {
        Some(post) => vec![
            Line::from(""),
            Line::from(Span::styled(format!(" {}", post.title), styles::title_style())),
            Line::from(Span::styled(
                format!(
                    " {} · {}",
                    format_optional(&post.author, "Olimpo Gym"),
                    post.created_at.as_deref().map(format_date).unwrap_or_default()
                ),
                styles::muted_style(),
            )),
            Line::from(""),
            Line::from(format!(" {}", post.excerpt)),
            Line::from(""),
            Line::from(Span::styled(
                format!(" #{}", post.tags.join(" #")),
                styles::link_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" [Enter] ", styles::help_key_style()),
                Span::styled("read  ", styles::help_desc_style()),
                Span::styled("[c] ", styles::help_key_style()),
                Span::styled("category  ", styles::help_desc_style()),
                Span::styled("[/] ", styles::help_key_style()),
                Span::styled("search", styles::help_desc_style()),
            ]),
        ],
        None if app.is_loading() => vec![Line::from(Span::styled(" Loading posts...", styles::muted_style()))],
        None => vec![Line::from(Span::styled(" No posts match", styles::muted_style()))],
    };

    let preview = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(preview, chunks[1]);
}

pub fn render_post(frame: &mut Frame, app: &App, area: Rect) {
    let Some(post) = &app.post else {
        render_text(frame, area, "Blog", vec![Line::from(Span::styled(" Loading post...", styles::muted_style()))]);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                " {} · {} · {} views",
                format_optional(&post.author, "Olimpo Gym"),
                post.created_at.as_deref().map(format_date).unwrap_or_default(),
                post.views.unwrap_or(0)
            ),
            styles::muted_style(),
        )),
        Line::from(""),
    ];
    for paragraph in post.content.lines() {
        lines.push(Line::from(format!(" {}", paragraph)));
    }
    if !post.tags.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" #{}", post.tags.join(" #")), styles::link_style())));
    }
    render_text(frame, area, &post.title, lines);
}
