//! Shared UI components (status bar, add panel, toast, help overlay).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, FormField, InputMode, ToastKind};
use crate::cache::USERS_QUERY;

/// Render the bottom status bar with mode, counts, and cache age.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::EditRow => "EDIT",
        InputMode::AddForm => "ADD",
        InputMode::Help => "HELP",
    };
    let fetched = app
        .cache
        .fetched_at(USERS_QUERY)
        .map(|at| format!("  fetched {}s ago", at.elapsed().as_secs()))
        .unwrap_or_default();
    let editing = app
        .editing_id
        .as_deref()
        .map(|id| format!("  editing:{id}"))
        .unwrap_or_default();
    let adding = if app.adding { "  add-panel" } else { "" };
    let msg = format!(
        "mode: {mode}  users:{}  rows/page:{}{fetched}{editing}{adding}",
        app.users.len(),
        app.rows_per_page,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the add panel: three labeled inputs backed by the shared form.
pub fn render_add_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.input_mode == InputMode::AddForm;
    let field_line = |label: &str, value: &str, active: bool| {
        let marker = if active { "▶" } else { " " };
        let cursor = if active { "▏" } else { "" };
        format!("{marker} {label:<7}{value}{cursor}")
    };

    let body = format!(
        "{}\n{}\n{}\n\nEnter: save  Tab: next field  Esc: back to table",
        field_line("ID:", &app.form.id, focused && app.form.focus == FormField::Id),
        field_line("Name:", &app.form.name, focused && app.form.focus == FormField::Name),
        field_line("Email:", &app.form.email, focused && app.form.focus == FormField::Email),
    );

    let border = if focused {
        Style::default().fg(app.theme.title)
    } else {
        Style::default().fg(app.theme.border)
    };
    let p = Paragraph::new(body)
        .style(Style::default().fg(app.theme.text))
        .block(Block::default().title("Add user").borders(Borders::ALL).border_style(border));
    f.render_widget(p, area);
}

/// Render the transient notification over the bottom-right corner.
pub fn render_toast(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(toast) = &app.toast else {
        return;
    };
    let msg_width = toast.message.chars().count().min(120) as u16;
    let width = (msg_width + 4).min(area.width.saturating_sub(2)).max(12);
    let height = 3u16.min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 2),
        width: width.min(area.width),
        height,
    };
    let color = match toast.kind {
        ToastKind::Success => app.theme.success,
        ToastKind::Error => app.theme.error,
    };
    let p = Paragraph::new(toast.message.clone())
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help overlay with the key reference.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 62u16.min(area.width.saturating_sub(4)).max(40);
    let height = 16u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::ITALIC));
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Help", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
        Line::from(vec![Span::raw("Navigate: "), key("Arrow keys / j k, PageUp, PageDown")]),
        Line::from(vec![Span::raw("Add user: "), key("a"), Span::raw(" (Enter saves, Esc goes back to the table)")]),
        Line::from(vec![Span::raw("Edit row: "), key("e / Enter"), Span::raw(" (Enter saves, Esc cancels)")]),
        Line::from(vec![Span::raw("Delete row: "), key("d / Delete")]),
        Line::from(vec![Span::raw("Export CSV: "), key("x"), Span::raw(" (writes users.csv)")]),
        Line::from(vec![Span::raw("Refresh list: "), key("r")]),
        Line::from(vec![Span::raw("Quit: "), key("q")]),
        Line::raw(""),
        Line::raw("Keys come from keybinds.conf, colors from theme.conf."),
        Line::raw(""),
        Line::from(vec![Span::raw("Close help: "), key("any key")]),
    ];
    if area.height < 20 {
        lines.truncate(height.saturating_sub(2) as usize);
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
