use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::metrics;
use crate::models::{DashboardReport, FleetReport};
use crate::store::CollectionKind;
use crate::sync::SyncState;
use crate::ui::styles;
use crate::utils::format_money;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_counts(frame, app, chunks[0]);
    render_fleet_summary(frame, app, chunks[1]);
}

/// Server aggregate when available, locally computed otherwise.
fn dashboard_numbers(app: &App) -> DashboardReport {
    app.reports.dashboard.clone().unwrap_or_else(|| {
        metrics::dashboard_report(
            &app.store.vehicles,
            &app.store.customers,
            &app.store.rentals,
            app.today(),
        )
    })
}

fn fleet_numbers(app: &App) -> FleetReport {
    app.reports
        .fleet
        .clone()
        .unwrap_or_else(|| metrics::fleet_report(&app.store.vehicles))
}

fn render_counts(frame: &mut Frame, app: &App, area: Rect) {
    let report = dashboard_numbers(app);

    let mut lines = vec![
        Line::from(""),
        stat_line("Total Vehicles", report.vehicle_count.to_string()),
        stat_line("Total Customers", report.customer_count.to_string()),
        stat_line("Active Rentals", report.active_rentals.to_string()),
        stat_line("Today's Revenue", format_money(report.today_revenue)),
        Line::from(""),
    ];

    let sync_label = |state: SyncState| match state {
        SyncState::Idle => Span::styled("idle", styles::muted_style()),
        SyncState::Loading => Span::styled("syncing...", styles::highlight_style()),
        SyncState::Synced => Span::styled("synced", styles::success_style()),
        SyncState::Failed => Span::styled("failed", styles::error_style()),
    };
    lines.push(Line::from(Span::styled("  Sync", styles::title_style())));
    for kind in [
        CollectionKind::Vehicles,
        CollectionKind::Customers,
        CollectionKind::Rentals,
    ] {
        lines.push(Line::from(vec![
            Span::styled(
                format!("    {:<11}", format!("{}:", kind.label())),
                styles::muted_style(),
            ),
            sync_label(app.sync_states.get(kind)),
        ]));
    }
    if app.sync_states.any_failed() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "    Some data may be out of date",
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Overview ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_fleet_summary(frame: &mut Frame, app: &App, area: Rect) {
    let report = fleet_numbers(app);

    let lines = vec![
        Line::from(""),
        stat_line("Fleet Size", report.total_vehicles.to_string()),
        stat_line("Available", report.available.to_string()),
        stat_line("Rented", report.rented.to_string()),
        stat_line("Maintenance", report.maintenance.to_string()),
        stat_line("Utilization", format!("{:.1}%", report.utilization)),
        stat_line("Avg Rating", format!("{:.1}", report.avg_rating)),
    ];

    let block = Block::default()
        .title(" Fleet ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn stat_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<18}", label.to_string()), styles::muted_style()),
        Span::styled(value, styles::list_item_style()),
    ])
}
