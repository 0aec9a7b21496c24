//! UI rendering with Ratatui.

use crate::app::{App, InputMode};
use keyroll_core::row::type_options;
use keyroll_core::visibility;
use keyroll_core::{Column, Row as RecordRow};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState},
    Frame,
};

const MASK: &str = "••••••••";

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help line
        ])
        .split(area);

    render_table(frame, app, chunks[0]);
    render_status(frame, app, chunks[1]);
    render_help(frame, app, chunks[2]);

    match app.input_mode {
        InputMode::SelectType => render_type_selector(frame, app, area),
        InputMode::ConfirmDelete => render_confirm_delete(frame, app, area),
        _ => {}
    }
}

/// Render the record table.
fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.search_query.is_empty() && app.input_mode != InputMode::Search {
        format!(" 🔑 Accounts ({}) ", app.store.len())
    } else {
        format!(" 🔍 {}_ ", app.search_query)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let header = Row::new(
        Column::ALL
            .iter()
            .map(|c| Cell::from(c.title()))
            .chain(std::iter::once(Cell::from(""))),
    )
    .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = app
        .visible
        .iter()
        .enumerate()
        .filter_map(|(i, id)| app.table.get(*id).map(|row| (i, row)))
        .map(|(i, row)| table_row(app, i, row))
        .collect();

    if rows.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let message = if app.table.is_empty() {
            "No accounts yet. Press 'a' to add one"
        } else {
            "No accounts match the filter"
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, centered_rect(inner.width, 1, inner));
        return;
    }

    let widths = [
        Constraint::Percentage(28),
        Constraint::Length(12),
        Constraint::Percentage(30),
        Constraint::Percentage(30),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(Style::default().bg(Color::Rgb(40, 40, 55)));

    let mut state = TableState::default().with_selected(Some(app.selected_row));
    frame.render_stateful_widget(table, area, &mut state);
}

fn table_row<'a>(app: &'a App, index: usize, row: &'a RecordRow) -> Row<'a> {
    let is_selected_row = index == app.selected_row;
    let record_type = row.record_type();

    let mut cells: Vec<Cell> = Column::ALL
        .iter()
        .map(|&column| {
            let focused = is_selected_row && app.current_column() == Some(column);
            let editing = focused && app.input_mode == InputMode::Editing;
            let text = if editing {
                format!("{}_", app.edit_buffer)
            } else {
                cell_text(app, row, column)
            };

            let mut style = match column {
                Column::Tags => Style::default().fg(Color::Magenta),
                Column::Type => Style::default().fg(Color::Blue),
                Column::Login => Style::default().fg(Color::Green),
                Column::Secret => Style::default().fg(Color::Yellow),
            };
            if row.cell(column).error.is_some() {
                style = style.fg(Color::Red);
            }
            if visibility::column_span(record_type, column) == 0 {
                style = Style::default();
            } else if focused {
                style = style.bg(Color::Rgb(60, 60, 80)).add_modifier(Modifier::BOLD);
            }

            Cell::from(text).style(style)
        })
        .collect();

    let delete_focused = is_selected_row && app.current_column().is_none();
    let delete_style = if delete_focused {
        Style::default().fg(Color::Red).bg(Color::Rgb(60, 60, 80)).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    cells.push(Cell::from("[x]").style(delete_style));

    Row::new(cells)
}

/// Text shown for a cell outside edit mode.
fn cell_text(app: &App, row: &RecordRow, column: Column) -> String {
    let cell = row.cell(column);
    match column {
        // Placeholder so the login column reads as spanning the hidden one.
        Column::Secret if !visibility::is_editable(row.record_type(), column) => String::new(),
        Column::Secret => match cell.display() {
            "" => "(required)".to_string(),
            secret if app.secret_revealed(row.id) => secret.to_string(),
            _ => MASK.to_string(),
        },
        Column::Type if cell.display().is_empty() => "—".to_string(),
        _ => cell.display().to_string(),
    }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let error = app
        .current_row()
        .and_then(|row| app.current_column().and_then(|c| row.cell(c).error.clone()));

    let line = match app.status.clone().or(error) {
        Some(message) => Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(Color::Red)),
            Span::styled(message, Style::default().fg(Color::Red)),
        ]),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.input_mode {
        InputMode::Normal => {
            "Enter: edit | a: add | d: delete | v: show password | /: filter | q: quit"
        }
        InputMode::Editing => "Enter/Tab: save | Esc: cancel",
        InputMode::SelectType => "↑/↓: choose | Enter: apply | Esc: cancel",
        InputMode::Search => "Type to filter | Enter: keep filter | Esc: clear",
        InputMode::ConfirmDelete => "y: delete | any other key: keep",
    };
    let paragraph = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Render the type selector popup.
fn render_type_selector(frame: &mut Frame, app: &App, area: Rect) {
    let options = type_options();
    let dialog_area = centered_rect(30, options.len() as u16 + 2, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Type ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = if i == app.type_choice {
                Style::default()
                    .bg(Color::Rgb(60, 40, 80))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(option.label.clone())).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), dialog_area);
}

/// Render the delete confirmation dialog.
fn render_confirm_delete(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_rect(44, 3, area);
    frame.render_widget(Clear, dialog_area);

    let login = app
        .current_row()
        .map(|row| row.cell(Column::Login).display().to_string())
        .unwrap_or_default();
    let name = if login.is_empty() { "this account".to_string() } else { login };

    let block = Block::default()
        .title(" Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let paragraph = Paragraph::new(format!("Delete {name}? (y/n)"))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, dialog_area);
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
