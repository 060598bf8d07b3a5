use ratatui::{
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::models::RentalStatus;
use crate::ui::styles;
use crate::utils::{format_date, format_money, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        "ID", "Vehicle", "Customer", "Start", "Days", "Total", "Status",
    ])
    .style(styles::title_style())
    .bottom_margin(1);

    let rows: Vec<Row> = app
        .store
        .rentals
        .iter()
        .enumerate()
        .map(|(i, rental)| {
            // Dangling references render as "Unknown" rather than breaking the row
            let vehicle = app.store.vehicle_display(rental);
            let customer = app.store.customer_display(rental);
            let status_style = match rental.status {
                RentalStatus::Active => styles::success_style(),
                RentalStatus::Completed => styles::muted_style(),
            };
            let row = Row::new(vec![
                Cell::from(rental.id.clone()),
                Cell::from(truncate_string(vehicle, 20)),
                Cell::from(truncate_string(customer, 20)),
                Cell::from(format_date(rental.start_date)),
                Cell::from(rental.days.to_string()),
                Cell::from(format_money(rental.total_cost)),
                Cell::from(rental.status.label()).style(status_style),
            ]);
            if i == app.rental_selection {
                row.style(styles::selected_style())
            } else {
                row.style(styles::list_item_style())
            }
        })
        .collect();

    let block = Block::default()
        .title(format!(" Rentals ({}) ", app.store.rentals.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if rows.is_empty() {
        let empty = ratatui::widgets::Paragraph::new(Line::styled(
            "  No rentals - press [n] to process one",
            styles::muted_style(),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Min(14),
            Constraint::Min(14),
            Constraint::Length(13),
            Constraint::Length(5),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block);

    let mut state = TableState::default();
    state.select(Some(app.rental_selection));
    frame.render_stateful_widget(table, area, &mut state);
}
