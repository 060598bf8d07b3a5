//! Keyboard input handling for the TUI.
//!
//! Translates keyboard events into application state changes. Mutating
//! actions are dispatched to the async App methods and awaited here; the
//! main loop stays single-threaded, only list fetches run in the background.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, CustomerForm, RentalForm, Tab, VehicleForm};
use crate::ui::tabs::reports::REPORT_KINDS;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                app.state = AppState::Normal;
            }
            Ok(false)
        }
        AppState::ConfirmingQuit => handle_quit_confirm(app, key),
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.confirm_delete().await;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.close_overlay();
                }
                _ => {}
            }
            Ok(false)
        }
        AppState::Rating => {
            match key.code {
                // Ratings are integers 1-5; anything else is ignored
                KeyCode::Char(c @ '1'..='5') => {
                    let rating = c as u8 - b'0';
                    app.submit_rating(rating).await;
                }
                KeyCode::Esc => app.close_overlay(),
                _ => {}
            }
            Ok(false)
        }
        AppState::AddingVehicle => handle_vehicle_form(app, key).await,
        AppState::AddingCustomer => handle_customer_form(app, key).await,
        AppState::ProcessingRental => handle_rental_form(app, key).await,
        AppState::Normal => handle_normal(app, key).await,
        AppState::Quitting => Ok(true),
    }
}

fn handle_quit_confirm(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.state = AppState::Quitting;
            Ok(true)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
            Ok(false)
        }
        _ => Ok(false),
    }
}

async fn handle_vehicle_form(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Tab | KeyCode::Down => {
            app.vehicle_form.focus = (app.vehicle_form.focus + 1) % VehicleForm::FIELD_COUNT;
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.vehicle_form.focus =
                (app.vehicle_form.focus + VehicleForm::FIELD_COUNT - 1) % VehicleForm::FIELD_COUNT;
        }
        KeyCode::Enter => app.submit_vehicle_form().await,
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(' ') if app.vehicle_form.focus == 1 => {
            app.vehicle_form.cycle_category();
        }
        KeyCode::Left | KeyCode::Right if app.vehicle_form.focus == 1 => {
            app.vehicle_form.cycle_category();
        }
        KeyCode::Char(c) => app.form_input(c),
        _ => {}
    }
    Ok(false)
}

async fn handle_customer_form(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Tab | KeyCode::Down => {
            app.customer_form.focus = (app.customer_form.focus + 1) % CustomerForm::FIELD_COUNT;
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.customer_form.focus = (app.customer_form.focus + CustomerForm::FIELD_COUNT - 1)
                % CustomerForm::FIELD_COUNT;
        }
        KeyCode::Enter => app.submit_customer_form().await,
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_input(c),
        _ => {}
    }
    Ok(false)
}

async fn handle_rental_form(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Tab | KeyCode::Down => {
            app.rental_form.focus = (app.rental_form.focus + 1) % RentalForm::FIELD_COUNT;
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.rental_form.focus =
                (app.rental_form.focus + RentalForm::FIELD_COUNT - 1) % RentalForm::FIELD_COUNT;
        }
        KeyCode::Enter => app.submit_rental_form().await,
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Left => match app.rental_form.focus {
            0 => {
                let len = app.store.vehicles.len();
                if len > 0 {
                    app.rental_form.vehicle_index =
                        (app.rental_form.vehicle_index + len - 1) % len;
                }
            }
            1 => {
                let len = app.store.customers.len();
                if len > 0 {
                    app.rental_form.customer_index =
                        (app.rental_form.customer_index + len - 1) % len;
                }
            }
            _ => {}
        },
        KeyCode::Right => match app.rental_form.focus {
            0 => {
                let len = app.store.vehicles.len();
                if len > 0 {
                    app.rental_form.vehicle_index = (app.rental_form.vehicle_index + 1) % len;
                }
            }
            1 => {
                let len = app.store.customers.len();
                if len > 0 {
                    app.rental_form.customer_index = (app.rental_form.customer_index + 1) % len;
                }
            }
            _ => {}
        },
        // Days is numeric only
        KeyCode::Char(c) if c.is_ascii_digit() => app.form_input(c),
        _ => {}
    }
    Ok(false)
}

async fn handle_normal(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => app.current_tab = Tab::Dashboard,
        KeyCode::Char('2') => app.current_tab = Tab::Vehicles,
        KeyCode::Char('3') => app.current_tab = Tab::Customers,
        KeyCode::Char('4') => app.current_tab = Tab::Rentals,
        KeyCode::Char('5') => app.current_tab = Tab::Reports,
        KeyCode::Left => app.current_tab = app.current_tab.prev(),
        KeyCode::Right => app.current_tab = app.current_tab.next(),
        KeyCode::Up | KeyCode::Char('k') => move_selection(app, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(app, 1),
        KeyCode::Char('u') => app.refresh_all_background(),
        KeyCode::Char('o') => app.toggle_offline_mode(),
        KeyCode::Char('a') => match app.current_tab {
            Tab::Vehicles => app.open_vehicle_form(),
            Tab::Customers => app.open_customer_form(),
            _ => {}
        },
        KeyCode::Char('r') => app.open_rate_prompt(),
        KeyCode::Char('x') | KeyCode::Delete => app.open_delete_prompt(),
        KeyCode::Char('n') => {
            if app.current_tab == Tab::Rentals {
                app.open_rental_form();
            }
        }
        KeyCode::Enter => {
            if app.current_tab == Tab::Rentals {
                app.return_selected_vehicle().await;
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Move the selection on the current tab, clamped to the list bounds.
fn move_selection(app: &mut App, delta: i64) {
    let (selection, len) = match app.current_tab {
        Tab::Vehicles => (&mut app.vehicle_selection, app.store.vehicles.len()),
        Tab::Customers => (&mut app.customer_selection, app.store.customers.len()),
        Tab::Rentals => (&mut app.rental_selection, app.store.rentals.len()),
        Tab::Reports => (&mut app.report_selection, REPORT_KINDS.len()),
        Tab::Dashboard => return,
    };
    if len == 0 {
        return;
    }
    let current = *selection as i64;
    let next = (current + delta).clamp(0, len as i64 - 1);
    *selection = next as usize;
}
