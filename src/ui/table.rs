use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::app::{AppState, FormField, FormState, InputMode, Theme};

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let rpp = app.rows_per_page.max(1);
    let start = (app.selected_index / rpp) * rpp;
    let end = (start + rpp).min(app.users.len());
    let slice = &app.users[start..end];

    let rows = slice.iter().enumerate().map(|(i, user)| {
        let absolute_index = start + i;
        if app.editing_id.as_deref() == Some(user.id.as_str()) {
            editing_row(&app.form, app.input_mode == InputMode::EditRow, &app.theme)
        } else {
            let style = if absolute_index == app.selected_index {
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            Row::new(vec![
                Cell::from(user.id.clone()),
                Cell::from(user.name.clone()),
                Cell::from(user.email.clone()),
            ])
            .style(style)
        }
    });

    let widths = [
        Constraint::Length(12),
        Constraint::Percentage(40),
        Constraint::Percentage(50),
    ];

    let header = Row::new(vec!["ID", "NAME", "EMAIL"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

/// The row under edit renders its fields as inputs. The id cell is shown
/// dimmed and never editable; the focused field carries a cursor mark.
fn editing_row(form: &FormState, focused: bool, theme: &Theme) -> Row<'static> {
    Row::new(vec![
        Cell::from(form.id.clone()).style(Style::default().fg(theme.muted)),
        input_cell(&form.name, focused && form.focus == FormField::Name, theme),
        input_cell(&form.email, focused && form.focus == FormField::Email, theme),
    ])
}

fn input_cell(value: &str, focused: bool, theme: &Theme) -> Cell<'static> {
    if focused {
        Cell::from(format!("{value}▏")).style(
            Style::default()
                .fg(theme.highlight_fg)
                .add_modifier(Modifier::UNDERLINED),
        )
    } else {
        Cell::from(value.to_string()).style(
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::UNDERLINED),
        )
    }
}
