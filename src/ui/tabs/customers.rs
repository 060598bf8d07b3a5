use ratatui::{
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::models::LoyaltyTier;
use crate::ui::styles;
use crate::utils::{format_phone, format_rating, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["ID", "Name", "Email", "Phone", "Points", "Tier", "Rating"])
        .style(styles::title_style())
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .store
        .customers
        .iter()
        .enumerate()
        .map(|(i, customer)| {
            let tier = customer.loyalty_tier();
            let tier_style = match tier {
                LoyaltyTier::Gold => styles::highlight_style(),
                LoyaltyTier::Silver => styles::list_item_style(),
                LoyaltyTier::Bronze => styles::muted_style(),
            };
            let row = Row::new(vec![
                Cell::from(customer.id.clone()),
                Cell::from(truncate_string(&customer.name, 20)),
                Cell::from(truncate_string(&customer.email, 24)),
                Cell::from(format_phone(&customer.phone)),
                Cell::from(customer.loyalty_points.to_string()),
                Cell::from(tier.label()).style(tier_style),
                Cell::from(format_rating(customer.rating)),
            ]);
            if i == app.customer_selection {
                row.style(styles::selected_style())
            } else {
                row.style(styles::list_item_style())
            }
        })
        .collect();

    let block = Block::default()
        .title(format!(" Customers ({}) ", app.store.customers.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if rows.is_empty() {
        let empty = ratatui::widgets::Paragraph::new(Line::styled(
            "  No customers - press [a] to register one or [u] to sync",
            styles::muted_style(),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Min(20),
            Constraint::Length(15),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(block);

    let mut state = TableState::default();
    state.select(Some(app.customer_selection));
    frame.render_stateful_widget(table, area, &mut state);
}
