// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::io;
use unitdeck_app::{
    AppState, DisplayRow, NavCommand, UnitEnablement, UnitEntry, UnitSubstate, ViewportState,
};

const BACK_HINT: &str = "Press 'r' to return to the full unit list";
const KEY_HINT: &str = "? - help, / - search";

/// Backend the main loop drives. Implementations talk to a real init
/// system or to an in-memory corpus; every call is synchronous and may
/// block.
pub trait UnitDirectory {
    /// Re-query the backend, replacing its snapshot idempotently.
    fn refresh(&mut self) -> Result<()>;
    /// The grouped, header-annotated row sequence of the last refresh.
    fn rows_sorted(&self) -> Vec<DisplayRow>;
    /// Flip whether `unit` starts at boot.
    fn toggle_enablement(&mut self, unit: &UnitEntry) -> Result<()>;
    /// Start or stop `unit` depending on its current substate.
    fn toggle_runtime(&mut self, unit: &UnitEntry) -> Result<()>;
    /// Re-read unit definitions from disk.
    fn reload_daemon(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SearchUiState {
    visible: bool,
    query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewUi {
    help_visible: bool,
    search: SearchUiState,
}

/// Raw mode + alternate screen, released on every exit path.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("create terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the dashboard until the user quits. One blocking event read per
/// iteration; every operation runs to completion before the next event is
/// taken, and a resize is handled in-band like any key.
pub fn run_app<D: UnitDirectory>(state: &mut AppState, directory: &mut D) -> Result<()> {
    let mut session = TerminalSession::enter()?;

    let size = session.terminal.size().context("query terminal size")?;
    let mut viewport = ViewportState::new(size.width, size.height);
    let mut view = ViewUi::default();

    if let Err(error) = refresh_rows(directory, &mut viewport) {
        state.set_status(error.to_string());
    }

    loop {
        session
            .terminal
            .draw(|frame| render(frame, state, &viewport, &view))
            .context("draw frame")?;

        match event::read().context("read event")? {
            Event::Key(key) => {
                if handle_key_event(state, directory, &mut viewport, &mut view, key) {
                    break;
                }
            }
            Event::Resize(width, height) => viewport.resize(width, height),
            _ => {}
        }
    }

    Ok(())
}

fn refresh_rows<D: UnitDirectory>(directory: &mut D, viewport: &mut ViewportState) -> Result<()> {
    directory.refresh()?;
    viewport.set_rows(directory.rows_sorted());
    Ok(())
}

/// Route one key event. Returns true when the app should quit.
fn handle_key_event<D: UnitDirectory>(
    state: &mut AppState,
    directory: &mut D,
    viewport: &mut ViewportState,
    view: &mut ViewUi,
    key: KeyEvent,
) -> bool {
    if view.search.visible {
        handle_search_key(state, viewport, view, key);
        return false;
    }

    if view.help_visible {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            view.help_visible = false;
        }
        return false;
    }

    // A key press acknowledges the previous status message; failed
    // operations below set a fresh one.
    state.clear_status();

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
            viewport.apply(NavCommand::MoveUp);
        }
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
            viewport.apply(NavCommand::MoveDown);
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) | (KeyCode::PageUp, _) => {
            viewport.apply(NavCommand::PageUp);
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) | (KeyCode::PageDown, _) => {
            viewport.apply(NavCommand::PageDown);
        }
        (KeyCode::Char(' '), KeyModifiers::NONE) => {
            toggle_selected(state, directory, viewport, ToggleKind::Enablement);
        }
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            toggle_selected(state, directory, viewport, ToggleKind::Runtime);
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            state.filter.clear();
            match refresh_rows(directory, viewport) {
                Ok(()) => state.set_status("Updated.."),
                Err(error) => state.set_status(error.to_string()),
            }
        }
        (KeyCode::Char('/'), KeyModifiers::NONE) => {
            view.search.visible = true;
            view.search.query.clear();
        }
        (KeyCode::Char('?'), KeyModifiers::NONE) => {
            view.help_visible = true;
        }
        _ => {}
    }

    false
}

/// Keys routed to the search overlay while it is open. Confirm and cancel
/// both close the overlay; only confirm touches the row set.
fn handle_search_key(
    state: &mut AppState,
    viewport: &mut ViewportState,
    view: &mut ViewUi,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Enter => {
            let pattern = view.search.query.trim().to_owned();
            view.search.visible = false;
            view.search.query.clear();
            if pattern.is_empty() {
                return;
            }
            match state.filter.apply(&pattern, viewport) {
                Ok(_) => state.clear_status(),
                Err(error) => state.set_status(error.to_string()),
            }
        }
        KeyCode::Esc | KeyCode::F(10) => {
            view.search.visible = false;
            view.search.query.clear();
        }
        KeyCode::Backspace => {
            view.search.query.pop();
        }
        KeyCode::Char(ch) => view.search.query.push(ch),
        _ => {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToggleKind {
    Enablement,
    Runtime,
}

/// Forward the highlighted unit to the backend, then reload and re-fetch.
/// On any failure the row set is left exactly as it was and the backend's
/// message becomes the status line; the engine never patches a row's
/// displayed state locally.
fn toggle_selected<D: UnitDirectory>(
    state: &mut AppState,
    directory: &mut D,
    viewport: &mut ViewportState,
    kind: ToggleKind,
) {
    let Some(unit) = viewport.selected_unit().cloned() else {
        state.set_status("no unit selected");
        return;
    };

    let toggled = match kind {
        ToggleKind::Enablement => directory.toggle_enablement(&unit),
        ToggleKind::Runtime => directory.toggle_runtime(&unit),
    };
    if let Err(error) = toggled {
        state.set_status(error.to_string());
        return;
    }

    let reloaded = directory
        .reload_daemon()
        .and_then(|()| refresh_rows(directory, viewport));
    match reloaded {
        Ok(()) => {
            state.filter.clear();
            state.clear_status();
        }
        Err(error) => state.set_status(error.to_string()),
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, viewport: &ViewportState, view: &ViewUi) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state))
        .style(header_style(state))
        .block(Block::default().title("unitdeck").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_units(frame, layout[1], viewport);

    let width = usize::from(layout[2].width.saturating_sub(2));
    let status = Paragraph::new(status_text(state, viewport, width))
        .style(Style::default().fg(Color::Magenta))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view.help_visible {
        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }

    if view.search.visible {
        let area = centered_rect(60, 20, frame.area());
        frame.render_widget(Clear, area);
        let search = Paragraph::new(search_overlay_text(&view.search.query)).block(
            Block::default()
                .title("filter by pattern")
                .borders(Borders::ALL),
        );
        frame.render_widget(search, area);
    }
}

fn render_units(frame: &mut ratatui::Frame<'_>, area: Rect, viewport: &ViewportState) {
    let width = usize::from(area.width.saturating_sub(2));
    let lines: Vec<Line<'_>> = viewport
        .visible_rows()
        .map(|(slot, row)| row_line(row, width, slot == viewport.selected()))
        .collect();
    let list = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn header_text(state: &AppState) -> String {
    match &state.status_line {
        Some(message) => message.clone(),
        None => match state.filter.pattern() {
            Some(pattern) => format!("managed units ~ /{pattern}/"),
            None => "managed units".to_owned(),
        },
    }
}

fn header_style(state: &AppState) -> Style {
    if state.status_line.is_some() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    }
}

fn row_line(row: &DisplayRow, width: usize, selected: bool) -> Line<'static> {
    let mut line = match row {
        DisplayRow::Unit(unit) => unit_line(unit, width),
        DisplayRow::GroupHeader { target } => header_line(target, width),
    };
    if selected {
        line = line.style(Style::default().add_modifier(Modifier::REVERSED));
    }
    line
}

/// One unit row: enablement glyph, substate glyph, id, right-aligned
/// description, truncated to the list width.
fn unit_line(unit: &UnitEntry, width: usize) -> Line<'static> {
    let (enablement, enablement_color) = enablement_glyph(unit.enablement);
    let (substate, substate_color) = substate_glyph(unit.substate);

    let prefix_width = 1 + enablement.len() + substate.len();
    let avail = width.saturating_sub(prefix_width);

    let id = truncated(&unit.id, avail);
    let gap_and_desc = avail.saturating_sub(id.chars().count());
    let description = truncated(&unit.description, gap_and_desc.saturating_sub(2));
    let pad = gap_and_desc.saturating_sub(description.chars().count());

    Line::from(vec![
        Span::raw(" "),
        Span::styled(enablement.to_owned(), Style::default().fg(enablement_color)),
        Span::styled(substate.to_owned(), Style::default().fg(substate_color)),
        Span::raw(id),
        Span::raw(" ".repeat(pad)),
        Span::styled(description, Style::default().fg(Color::Cyan)),
    ])
}

/// A group header: the target label capitalized and pluralized, centered
/// on a full-width highlighted band.
fn header_line(target: &str, width: usize) -> Line<'static> {
    let label = truncated(&group_label(target), width);
    let label_width = label.chars().count();
    let left = width.saturating_sub(label_width) / 2;
    let right = width.saturating_sub(label_width + left);
    let banner = format!("{}{}{}", " ".repeat(left), label, " ".repeat(right));
    Line::from(Span::styled(
        banner,
        Style::default().fg(Color::White).bg(Color::Blue),
    ))
}

fn group_label(target: &str) -> String {
    let mut label: String = target.to_owned();
    if let Some(first) = label.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    label.push('s');
    label
}

const fn enablement_glyph(state: UnitEnablement) -> (&'static str, Color) {
    match state {
        UnitEnablement::Enabled => ("[x]", Color::Green),
        UnitEnablement::Disabled => ("[ ]", Color::Magenta),
        UnitEnablement::Static => ("[s]", Color::Magenta),
        UnitEnablement::Masked => ("-m-", Color::Blue),
        UnitEnablement::Bad => ("-b-", Color::Red),
    }
}

const fn substate_glyph(state: UnitSubstate) -> (&'static str, Color) {
    match state {
        UnitSubstate::Running => ("  >  ", Color::Blue),
        UnitSubstate::Connected => ("  =  ", Color::Magenta),
        UnitSubstate::Other => ("     ", Color::Magenta),
    }
}

fn truncated(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Status block: unit position on the left, key hints on the right, and
/// the persistent back-to-full-list hint while a filter is active.
fn status_text(state: &AppState, viewport: &ViewportState, width: usize) -> String {
    let (ordinal, total) = viewport.position();
    let mut left = format!("{ordinal}/{total}");
    if state.filter.is_filtered() {
        left.push_str("  ");
        left.push_str(BACK_HINT);
    }

    let pad = width
        .saturating_sub(left.chars().count())
        .saturating_sub(KEY_HINT.len());
    if pad == 0 {
        return truncated(&left, width);
    }
    format!("{left}{}{KEY_HINT}", " ".repeat(pad))
}

fn search_overlay_text(query: &str) -> Text<'static> {
    Text::from(vec![
        Line::from(format!("/{query}_")),
        Line::from(""),
        Line::from(Span::styled(
            "Enter - apply, Esc - cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn help_overlay_text() -> Text<'static> {
    let version = env!("CARGO_PKG_VERSION");
    Text::from(vec![
        Line::from(format!("unitdeck {version}")),
        Line::from(""),
        Line::from("  j / down       select next unit"),
        Line::from("  k / up         select previous unit"),
        Line::from("  f / page down  scroll one page down"),
        Line::from("  b / page up    scroll one page up"),
        Line::from("  space          enable or disable the selected unit"),
        Line::from("  s              start or stop the selected unit"),
        Line::from("  r              clear the filter and refresh"),
        Line::from("  /              filter units by pattern"),
        Line::from("  q              quit"),
        Line::from(""),
        Line::from("  [x] enabled   [ ] disabled   [s] static"),
        Line::from("  -m- masked    -b- bad"),
        Line::from("  >   running   =   connected"),
        Line::from(""),
        Line::from(Span::styled(
            "press ? or esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
