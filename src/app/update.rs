use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::UserService;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, FormField, InputMode, LoadState, Toast};
use crate::cache::USERS_QUERY;
use crate::export;
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    service: &dyn UserService,
    api_url: &str,
) -> Result<()> {
    let mut app = AppState::new(api_url);

    // Show the loading frame before the initial (blocking) fetch.
    terminal.draw(|f| ui::render(f, &mut app))?;
    reload(&mut app, service);

    loop {
        if app.toast.as_ref().is_some_and(Toast::expired) {
            app.toast = None;
        }

        terminal.draw(|f| ui::render(f, &mut app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => match app.keymap.resolve(&key) {
                            Some(KeyAction::Quit) => break,
                            Some(KeyAction::MoveUp) => {
                                if app.selected_index > 0 {
                                    app.selected_index -= 1;
                                }
                            }
                            Some(KeyAction::MoveDown) => {
                                if app.selected_index + 1 < app.users.len() {
                                    app.selected_index += 1;
                                }
                            }
                            Some(KeyAction::PageUp) => {
                                let rpp = app.rows_per_page.max(1);
                                app.selected_index = app.selected_index.saturating_sub(rpp);
                            }
                            Some(KeyAction::PageDown) => {
                                let rpp = app.rows_per_page.max(1);
                                app.selected_index = (app.selected_index + rpp)
                                    .min(app.users.len().saturating_sub(1));
                            }
                            Some(KeyAction::AddUser) => open_add(&mut app),
                            Some(KeyAction::EditRow) => begin_edit(&mut app),
                            Some(KeyAction::DeleteSelection) => {
                                delete_selected(&mut app, service);
                            }
                            Some(KeyAction::ExportCsv) => export_csv(&mut app),
                            Some(KeyAction::Refresh) => refresh(&mut app, service),
                            Some(KeyAction::OpenHelp) => app.input_mode = InputMode::Help,
                            Some(KeyAction::Ignore) => {
                                // Esc in normal mode closes an open add panel.
                                if key.code == KeyCode::Esc && app.adding {
                                    app.adding = false;
                                }
                            }
                            _ => {}
                        },
                        InputMode::AddForm => handle_add_key(&mut app, service, key.code),
                        InputMode::EditRow => handle_edit_key(&mut app, service, key.code),
                        InputMode::Help => app.input_mode = InputMode::Normal,
                    }
                }
            }
        }

        let _uptime = app.started_at.elapsed();
    }

    Ok(())
}

fn handle_add_key(app: &mut AppState, service: &dyn UserService, code: KeyCode) {
    match code {
        // Esc only moves focus back to the table; the panel stays open with
        // its values, mirroring the failure behavior of submission.
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => submit_add(app, service),
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(false),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(false),
        KeyCode::Backspace => {
            app.form.focused_mut().pop();
        }
        KeyCode::Char(c) => app.form.focused_mut().push(c),
        _ => {}
    }
}

fn handle_edit_key(app: &mut AppState, service: &dyn UserService, code: KeyCode) {
    // The id column is displayed but never editable while editing a row.
    if app.form.focus == FormField::Id {
        app.form.focus = FormField::Name;
    }
    match code {
        KeyCode::Esc => cancel_edit(app),
        KeyCode::Enter => submit_edit(app, service),
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(true),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(true),
        KeyCode::Backspace => {
            app.form.focused_mut().pop();
        }
        KeyCode::Char(c) => app.form.focused_mut().push(c),
        _ => {}
    }
}

/// Read the user collection through the cache and mirror it into the screen
/// state. On a miss this is the network fetch; on a hit it is free.
pub fn reload(app: &mut AppState, service: &dyn UserService) {
    let fetched = app
        .cache
        .get_or_fetch(USERS_QUERY, || service.list_users())
        .map(|users| users.clone());
    match fetched {
        Ok(users) => {
            debug!(count = users.len(), "loaded user list");
            app.users = users;
            app.load = LoadState::Ready;
            if app.selected_index >= app.users.len() {
                app.selected_index = app.users.len().saturating_sub(1);
            }
        }
        Err(err) => {
            warn!(error = %err, "failed to load user list");
            match app.load {
                // Keep showing the last good list; just report.
                LoadState::Ready => app.toast_error(format!("Failed to load users: {err}")),
                _ => app.load = LoadState::Failed(err.to_string()),
            }
        }
    }
}

/// Explicit invalidate-then-refetch. Every successful mutation funnels
/// through here, as does the manual refresh key.
pub fn refresh(app: &mut AppState, service: &dyn UserService) {
    app.cache.invalidate(USERS_QUERY);
    reload(app, service);
}

/// Open the add panel (or refocus it). The form is deliberately not
/// cleared here; only successful submission clears it.
pub fn open_add(app: &mut AppState) {
    app.adding = true;
    app.form.focus = FormField::Id;
    app.input_mode = InputMode::AddForm;
}

pub fn submit_add(app: &mut AppState, service: &dyn UserService) {
    if !app.form.is_complete() {
        app.toast_error("Please fill all fields");
        return;
    }
    let user = app.form.as_user();
    match service.create_user(&user) {
        Ok(()) => {
            app.form.clear();
            app.adding = false;
            app.input_mode = InputMode::Normal;
            app.toast_success("User added successfully");
            refresh(app, service);
        }
        Err(err) => {
            warn!(error = %err, id = %user.id, "create failed");
            app.toast_error("Failed to add user");
        }
    }
}

/// Copy the selected row into the form and mark it as the row being
/// edited. Entering edit on another row replaces the previous edit state.
pub fn begin_edit(app: &mut AppState) {
    let Some(user) = app.selected_user().cloned() else {
        return;
    };
    app.editing_id = Some(user.id.clone());
    app.form.fill_from(&user);
    app.input_mode = InputMode::EditRow;
}

pub fn submit_edit(app: &mut AppState, service: &dyn UserService) {
    if !app.form.is_complete() {
        app.toast_error("Please fill all fields");
        return;
    }
    let user = app.form.as_user();
    match service.update_user(&user) {
        Ok(()) => {
            app.form.clear();
            app.editing_id = None;
            app.input_mode = InputMode::Normal;
            app.toast_success("User updated successfully");
            refresh(app, service);
        }
        Err(err) => {
            warn!(error = %err, id = %user.id, "update failed");
            app.toast_error("Failed to update user");
        }
    }
}

/// Leave edit mode without submitting, discarding in-progress values.
pub fn cancel_edit(app: &mut AppState) {
    app.editing_id = None;
    app.form.clear();
    app.input_mode = InputMode::Normal;
}

pub fn delete_selected(app: &mut AppState, service: &dyn UserService) {
    let Some(user) = app.selected_user().cloned() else {
        return;
    };
    match service.delete_user(&user.id) {
        Ok(()) => {
            app.toast_success("User deleted successfully");
            refresh(app, service);
        }
        Err(err) => {
            warn!(error = %err, id = %user.id, "delete failed");
            app.toast_error("Failed to delete user");
        }
    }
}

/// Write the currently rendered list to users.csv in the working directory.
pub fn export_csv(app: &mut AppState) {
    match export::write_csv(&app.users, export::EXPORT_FILE) {
        Ok(()) => {
            debug!(count = app.users.len(), file = export::EXPORT_FILE, "exported CSV");
            app.toast_success(format!(
                "Exported {} users to {}",
                app.users.len(),
                export::EXPORT_FILE
            ));
        }
        Err(err) => {
            warn!(error = %err, "CSV export failed");
            app.toast_error(format!("Failed to export CSV: {err}"));
        }
    }
}
