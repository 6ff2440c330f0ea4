use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_price, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let products = app.filtered_products();
    let name_width = chunks[0].width.saturating_sub(24) as usize;
    let items: Vec<ListItem> = products
        .iter()
        .enumerate()
        .map(|(i, product)| {
            let in_cart = app.cart.quantity(&product.id);
            let badge = if in_cart > 0 { format!(" x{}", in_cart) } else { String::new() };
            let style = if i == app.selection {
                styles::selected_style()
            } else if !product.available {
                styles::muted_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(format!(
                " {:<width$} {:>10}{}",
                truncate_string(&product.name, name_width),
                format_price(product.price),
                badge,
                width = name_width
            ))
            .style(style)
        })
        .collect();

    let category = app.product_category.as_deref().unwrap_or("All");
    let block = Block::default()
        .title(format!(" Shop: {} ({}) ", category, products.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let mut state = ListState::default();
    if !products.is_empty() {
        state.select(Some(app.selection));
    }
    frame.render_stateful_widget(List::new(items).block(block), chunks[0], &mut state);

    let mut lines = Vec::new();
    if let Some(product) = products.get(app.selection) {
        lines.push(Line::from(Span::styled(format!(" {}", product.name), styles::title_style())));
        lines.push(Line::from(format!(" {}", product.description)));
        if !product.available {
            lines.push(Line::from(Span::styled(" Out of stock", styles::error_style())));
        }
        lines.push(Line::from(""));
    } else if app.is_loading() {
        lines.push(Line::from(Span::styled(" Loading products...", styles::muted_style())));
    }

    lines.push(Line::from(Span::styled(
        format!(" Cart: {} item(s)", app.cart.item_count()),
        styles::highlight_style(),
    )));
    for product in app.products.iter().filter(|p| app.cart.quantity(&p.id) > 0) {
        lines.push(Line::from(format!(
            "   {} x{}",
            truncate_string(&product.name, 24),
            app.cart.quantity(&product.id)
        )));
    }
    if !app.cart.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" Total: {}", format_price(app.cart.total(&app.products))),
            styles::success_style(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [a] ", styles::help_key_style()),
        Span::styled("add  ", styles::help_desc_style()),
        Span::styled("[x] ", styles::help_key_style()),
        Span::styled("remove  ", styles::help_desc_style()),
        Span::styled("[X] ", styles::help_key_style()),
        Span::styled("empty  ", styles::help_desc_style()),
        Span::styled("[c] ", styles::help_key_style()),
        Span::styled("category", styles::help_desc_style()),
    ]));

    let cart = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(cart, chunks[1]);
}
