use ratatui::{
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::models::VehicleStatus;
use crate::ui::styles;
use crate::utils::{format_money, format_rating, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["ID", "Type", "Model", "Rate/Day", "Status", "Rating"])
        .style(styles::title_style())
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .store
        .vehicles
        .iter()
        .enumerate()
        .map(|(i, vehicle)| {
            let status_style =
                styles::vehicle_status_style(vehicle.status == VehicleStatus::Available);
            let row = Row::new(vec![
                Cell::from(vehicle.id.clone()),
                Cell::from(vehicle.category.label()),
                Cell::from(truncate_string(&vehicle.model, 24)),
                Cell::from(format!("{}/day", format_money(vehicle.rate))),
                Cell::from(vehicle.status.label()).style(status_style),
                Cell::from(format_rating(vehicle.rating)),
            ]);
            if i == app.vehicle_selection {
                row.style(styles::selected_style())
            } else {
                row.style(styles::list_item_style())
            }
        })
        .collect();

    let block = Block::default()
        .title(format!(" Vehicles ({}) ", app.store.vehicles.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if rows.is_empty() {
        let empty = ratatui::widgets::Paragraph::new(Line::styled(
            "  No vehicles - press [a] to add one or [u] to sync",
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
            Constraint::Length(11),
            Constraint::Min(18),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(block);

    let mut state = TableState::default();
    state.select(Some(app.vehicle_selection));
    frame.render_stateful_widget(table, area, &mut state);
}
