pub mod components;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, InputMode, LoadState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let area = f.area();

    let mut constraints = vec![Constraint::Length(3), Constraint::Min(5)];
    if app.adding {
        constraints.push(Constraint::Length(8));
    }
    constraints.push(Constraint::Length(1));
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(f, root[0], app);

    match &app.load {
        LoadState::Loading => {
            let p = Paragraph::new("Loading users...")
                .style(Style::default().fg(app.theme.muted))
                .block(
                    Block::default()
                        .title("Users")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(app.theme.border)),
                );
            f.render_widget(p, root[1]);
        }
        LoadState::Failed(message) => {
            let p = Paragraph::new(format!(
                "Could not load users from {}:\n{}\n\nPress r to retry, q to quit.",
                app.api_url, message
            ))
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(app.theme.error))
            .block(
                Block::default()
                    .title("Error")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(p, root[1]);
        }
        LoadState::Ready => {
            table::render_users_table(f, root[1], app);
        }
    }

    if app.adding {
        components::render_add_panel(f, root[2], app);
    }

    components::render_status_bar(f, root[root.len() - 1], app);
    components::render_toast(f, area, app);

    if app.input_mode == InputMode::Help {
        components::render_help_modal(f, area, app);
    }
}

fn render_header(f: &mut Frame, area: ratatui::layout::Rect, app: &AppState) {
    let p = Paragraph::new(format!(
        "usertable  {}  users:{}  — a: add; e/Enter: edit; d: delete; x: export csv; r: refresh; ?: help; q: quit",
        app.api_url,
        app.users.len()
    ))
    .block(
        Block::default()
            .title("usertable")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(
        Style::default()
            .fg(app.theme.header_fg)
            .bg(app.theme.header_bg),
    );
    f.render_widget(p, area);
}
