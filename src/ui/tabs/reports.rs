use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::metrics;
use crate::sync::ReportKind;
use crate::ui::styles;
use crate::utils::format_money;

pub const REPORT_KINDS: [ReportKind; 5] = [
    ReportKind::Dashboard,
    ReportKind::Fleet,
    ReportKind::Revenue,
    ReportKind::Customer,
    ReportKind::Utilization,
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(30)])
        .split(area);

    render_report_list(frame, app, chunks[0]);
    render_report_detail(frame, app, chunks[1]);
}

fn render_report_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = REPORT_KINDS
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let style = if i == app.report_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(format!(" {}", kind.label()))).style(style)
        })
        .collect();

    let block = Block::default()
        .title(" Reports ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.report_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_report_detail(frame: &mut Frame, app: &App, area: Rect) {
    let kind = REPORT_KINDS[app.report_selection.min(REPORT_KINDS.len() - 1)];

    // Server aggregate when available, locally computed otherwise. Both
    // paths produce the same shapes so the render code never knows which
    // one it got.
    let (lines, from_server) = match kind {
        ReportKind::Dashboard => {
            let from_server = app.reports.dashboard.is_some();
            let r = app.reports.dashboard.clone().unwrap_or_else(|| {
                metrics::dashboard_report(
                    &app.store.vehicles,
                    &app.store.customers,
                    &app.store.rentals,
                    app.today(),
                )
            });
            (
                vec![
                    stat("Vehicles", r.vehicle_count.to_string()),
                    stat("Customers", r.customer_count.to_string()),
                    stat("Active Rentals", r.active_rentals.to_string()),
                    stat("Today's Revenue", format_money(r.today_revenue)),
                ],
                from_server,
            )
        }
        ReportKind::Fleet => {
            let from_server = app.reports.fleet.is_some();
            let r = app
                .reports
                .fleet
                .clone()
                .unwrap_or_else(|| metrics::fleet_report(&app.store.vehicles));
            (
                vec![
                    stat("Total Vehicles", r.total_vehicles.to_string()),
                    stat("Available", r.available.to_string()),
                    stat("Rented", r.rented.to_string()),
                    stat("Maintenance", r.maintenance.to_string()),
                    stat("Utilization", format!("{:.1}%", r.utilization)),
                    stat("Avg Rating", format!("{:.1}", r.avg_rating)),
                ],
                from_server,
            )
        }
        ReportKind::Revenue => {
            let from_server = app.reports.revenue.is_some();
            let r = app
                .reports
                .revenue
                .clone()
                .unwrap_or_else(|| metrics::revenue_report(&app.store.rentals, app.today()));
            (
                vec![
                    stat("Total Revenue", format_money(r.total_revenue)),
                    stat("Today's Revenue", format_money(r.today_revenue)),
                    stat("Total Rentals", r.total_rentals.to_string()),
                    stat("Active Rentals", r.active_rentals.to_string()),
                    stat("Avg per Rental", format_money(r.avg_per_rental)),
                ],
                from_server,
            )
        }
        ReportKind::Customer => {
            let from_server = app.reports.customer.is_some();
            let r = app
                .reports
                .customer
                .clone()
                .unwrap_or_else(|| metrics::customer_report(&app.store.customers));
            (
                vec![
                    stat("Total Customers", r.total_customers.to_string()),
                    stat("Gold Members", r.gold_members.to_string()),
                    stat("Silver Members", r.silver_members.to_string()),
                    stat("Bronze Members", r.bronze_members.to_string()),
                    stat("Avg Rating", format!("{:.1}", r.avg_rating)),
                    stat("Retention Rate", format!("{:.1}%", r.retention_rate)),
                ],
                from_server,
            )
        }
        ReportKind::Utilization => {
            let from_server = app.reports.utilization.is_some();
            let r = app.reports.utilization.clone().unwrap_or_else(|| {
                metrics::utilization_report(
                    &app.store.vehicles,
                    &app.store.customers,
                    &app.store.rentals,
                )
            });
            (
                vec![
                    stat("Utilization", format!("{:.1}%", r.utilization)),
                    stat("Avg Duration", format!("{:.1} days", r.avg_rental_duration)),
                    stat("Total Rental Days", r.total_rental_days.to_string()),
                    stat("Peak Demand", r.peak_demand_type),
                    stat("Retention Rate", format!("{:.1}%", r.retention_rate)),
                ],
                from_server,
            )
        }
    };

    let mut content = vec![Line::from("")];
    content.extend(lines);
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        if from_server {
            "  Source: server report"
        } else {
            "  Source: computed locally"
        },
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(format!(" {} ", kind.label()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn stat(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<20}", label.to_string()), styles::muted_style()),
        Span::styled(value, styles::list_item_style()),
    ])
}
