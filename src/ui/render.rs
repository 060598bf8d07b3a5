use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Tab};
use crate::utils::format_money;

use super::styles;
use super::tabs::{customers, dashboard, rentals, reports, vehicles};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::AddingVehicle => render_vehicle_form_overlay(frame, app),
        AppState::AddingCustomer => render_customer_form_overlay(frame, app),
        AppState::ProcessingRental => render_rental_form_overlay(frame, app),
        AppState::Rating => render_rate_overlay(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Fleetdeck";
    let mode = if app.offline_mode { " [OFFLINE]" } else { "" };
    let help_hint = "[?] Help";
    let left_len = title.len() + mode.len();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(mode, styles::highlight_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(left_len + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        Tab::Dashboard,
        Tab::Vehicles,
        Tab::Customers,
        Tab::Rentals,
        Tab::Reports,
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if app.current_tab == *tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Vehicles => vehicles::render(frame, app, area),
        Tab::Customers => customers::render(frame, app, area),
        Tab::Rentals => rentals::render(frame, app, area),
        Tab::Reports => reports::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let last_updated = app.cache_ages.last_updated();

    let shortcuts = match app.current_tab {
        Tab::Vehicles => "[a]dd | [r]ate | [x] remove | [u]pdate | [q]uit",
        Tab::Customers => "[a]dd | [r]ate | [x] remove | [u]pdate | [q]uit",
        Tab::Rentals => "[n]ew | [Enter] return | [u]pdate | [q]uit",
        _ => "[u]pdate | [o]ffline | [q]uit",
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(" Updated {} ", last_updated)
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let left_style = if app
        .status_message
        .as_deref()
        .is_some_and(|m| m.starts_with("Error:"))
    {
        styles::error_style()
    } else {
        styles::muted_style()
    };

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

// ============================================================================
// Overlays
// ============================================================================

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn overlay_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default())
}

/// A labelled input field line with a cursor when focused.
fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<10}[", label.to_string()), styles::muted_style()),
        Span::styled(format!("{:<24}{}", value.to_string(), cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            format!("  Fleetdeck v{}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("  1-5       ", "Switch tabs"),
        help_line("  ←/→       ", "Prev/next tab"),
        help_line("  ↑/↓, j/k  ", "Navigate list"),
        help_line("  Esc       ", "Close overlay"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("  a         ", "Add vehicle/customer (on that tab)"),
        help_line("  r         ", "Rate selected vehicle/customer"),
        help_line("  x/Del     ", "Remove selected vehicle/customer"),
        help_line("  n         ", "Process new rental (Rentals tab)"),
        help_line("  Enter     ", "Return vehicle (Rentals tab)"),
        help_line("  u         ", "Sync with server"),
        help_line("  o         ", "Toggle offline mode"),
        help_line("  q         ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(help_text).block(overlay_block("Help")), area);
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key.to_string(), styles::help_key_style()),
        Span::styled(desc.to_string(), styles::help_desc_style()),
    ])
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block("Quit")), area);
}

fn render_vehicle_form_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 12, frame.area());
    frame.render_widget(Clear, area);

    let form = &app.vehicle_form;
    let category_focused = form.focus == 1;
    let category_style = if category_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };

    let lines = vec![
        Line::from(""),
        field_line("ID:", &form.id, form.focus == 0),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:<10}[", "Type:"), styles::muted_style()),
            Span::styled(
                format!("{:<24}", format!("< {} >", form.category().label())),
                category_style,
            ),
            Span::styled("]", styles::muted_style()),
        ]),
        field_line("Model:", &form.model, form.focus == 2),
        field_line("Rate/Day:", &form.rate, form.focus == 3),
        Line::from(""),
        Line::from(Span::styled(
            "  Tab: next field   Space: change type",
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "  Enter: submit   Esc: cancel",
            styles::muted_style(),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(overlay_block("Add Vehicle")),
        area,
    );
}

fn render_customer_form_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 12, frame.area());
    frame.render_widget(Clear, area);

    let form = &app.customer_form;
    let lines = vec![
        Line::from(""),
        field_line("ID:", &form.id, form.focus == 0),
        field_line("Name:", &form.name, form.focus == 1),
        field_line("Email:", &form.email, form.focus == 2),
        field_line("Phone:", &form.phone, form.focus == 3),
        Line::from(""),
        Line::from(Span::styled(
            "  Tab: next field   Enter: submit   Esc: cancel",
            styles::muted_style(),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(overlay_block("Register Customer")),
        area,
    );
}

fn render_rental_form_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(54, 13, frame.area());
    frame.render_widget(Clear, area);

    let form = &app.rental_form;

    let vehicle_label = app
        .store
        .vehicles
        .get(form.vehicle_index)
        .map(|v| format!("{} - {} ({}/day)", v.id, v.model, format_money(v.rate)))
        .unwrap_or_else(|| "none".to_string());
    let customer_label = app
        .store
        .customers
        .get(form.customer_index)
        .map(|c| format!("{} - {}", c.id, c.name))
        .unwrap_or_else(|| "none".to_string());

    let pick_line = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:<10}", label.to_string()), styles::muted_style()),
            Span::styled(format!("< {:<34} >", value.to_string()), style),
        ])
    };

    // Cost preview from the selected vehicle's daily rate
    let preview = form
        .days
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(|days| {
            app.store
                .vehicles
                .get(form.vehicle_index)
                .map(|v| v.rental_cost(days))
        })
        .map(format_money)
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(""),
        pick_line("Vehicle:", &vehicle_label, form.focus == 0),
        pick_line("Customer:", &customer_label, form.focus == 1),
        field_line("Days:", &form.days, form.focus == 2),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Total cost: ", styles::muted_style()),
            Span::styled(preview, styles::highlight_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Tab: next field   ←/→: change selection",
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            "  Enter: submit   Esc: cancel",
            styles::muted_style(),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(overlay_block("New Rental")),
        area,
    );
}

fn render_rate_overlay(frame: &mut Frame, app: &App) {
    let Some(ref prompt) = app.rate_prompt else {
        return;
    };
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("   Rate ", styles::muted_style()),
            Span::styled(prompt.name.clone(), styles::highlight_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[1]-[5]", styles::help_key_style()),
            Span::styled(" stars, ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block("Rate")), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let Some(ref prompt) = app.delete_prompt else {
        return;
    };
    let area = centered_rect_fixed(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("   Remove {} ", prompt.kind.label()), styles::muted_style()),
            Span::styled(prompt.name.clone(), styles::error_style()),
            Span::styled("?", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to remove, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block("Confirm")), area);
}
