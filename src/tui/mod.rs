//! Ratatui-based terminal UI.
//!
//! The TUI provides tabs for the three views, a search box and filter
//! pickers, then renders per-series statistics and the filtered record cards.
//! Acquisition runs on a worker thread so the screen keeps redrawing while
//! series are fetched.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::info;

use crate::app::session::{FetchTicket, FilterField, Session};
use crate::config::ApiConfig;
use crate::data::{Acquisition, BlsClient, SeriesCatalog, SeriesSource, acquire};
use crate::domain::{View, period_label};
use crate::error::{AppError, BlsError};
use crate::report::{category_badge, period_caption, truncate};

type FetchResult = (u64, Result<Acquisition, BlsError>);

/// Start the TUI.
pub fn run(config: ApiConfig, view: View) -> Result<(), AppError> {
    // Fail on a missing credential before taking over the terminal.
    let client = BlsClient::new(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(Arc::new(client), config, view);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    session: Session,
    source: Arc<dyn SeriesSource + Send + Sync>,
    config: ApiConfig,
    selected_field: usize,
    editing_search: bool,
    scroll: u16,
    status: String,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
}

impl App {
    fn new(source: Arc<dyn SeriesSource + Send + Sync>, config: ApiConfig, view: View) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            session: Session::new(SeriesCatalog::bls(), view),
            source,
            config,
            selected_field: 0,
            editing_search: false,
            scroll: 0,
            status: "Fetching BLS data...".to_string(),
            tx,
            rx,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.session.needs_fetch() {
                self.start_fetch();
                needs_redraw = true;
            }
            if self.drain_results() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Kick off a cycle for the current view/selection on a worker thread.
    fn start_fetch(&mut self) {
        let FetchTicket {
            generation,
            view,
            selection,
        } = self.session.begin_fetch();
        info!(generation, view = view.display_name(), "starting acquisition cycle");
        self.status = "Fetching BLS data...".to_string();

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let (start_year, end_year) = (self.config.start_year, self.config.end_year);
        thread::spawn(move || {
            let result = acquire(
                source.as_ref(),
                SeriesCatalog::bls(),
                view,
                &selection,
                start_year,
                end_year,
            );
            // The receiver is gone once the UI has quit.
            let _ = tx.send((generation, result));
        });
    }

    /// Apply finished cycles; returns whether anything changed on screen.
    fn drain_results(&mut self) -> bool {
        let mut changed = false;
        while let Ok((generation, result)) = self.rx.try_recv() {
            if self.session.finish_fetch(generation, result) {
                self.scroll = 0;
                self.status = match (self.session.error(), self.session.diagnostics().len()) {
                    (Some(_), _) => "Fetch failed.".to_string(),
                    (None, 0) => format!("Loaded {} records.", self.session.records().len()),
                    (None, n) => format!(
                        "Loaded {} records ({n} series failed).",
                        self.session.records().len()
                    ),
                };
                changed = true;
            }
        }
        changed
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_search {
            self.handle_search_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => self.switch_view(self.session.view().next()),
            KeyCode::BackTab => self.switch_view(self.session.view().prev()),
            KeyCode::Char('1') => self.switch_view(View::All),
            KeyCode::Char('2') => self.switch_view(View::National),
            KeyCode::Char('3') => self.switch_view(View::States),
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                let last = FilterField::visible(self.session.view()).len().saturating_sub(1);
                self.selected_field = (self.selected_field + 1).min(last);
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('/') => {
                self.editing_search = true;
                self.status = "Editing search. Enter to apply, Esc to cancel.".to_string();
            }
            KeyCode::Char('c') => {
                self.session.reset_filters();
                self.scroll = 0;
                self.status = "Filters reset.".to_string();
            }
            KeyCode::Char('g') => {
                self.session.toggle_records();
                self.scroll = 0;
            }
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::Char('r') => {
                self.session.invalidate();
            }
            _ => {}
        }

        false
    }

    fn handle_search_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_search = false;
                let submitted = self.session.search_query().to_string();
                self.session.set_search_text(submitted);
                self.status = "Search edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_search = false;
                self.scroll = 0;
                self.status = match self.session.submit_search() {
                    Some(state) => format!("Showing {state}."),
                    None => format!("{} records match.", self.session.derived().filtered.len()),
                };
                self.clamp_selected_field();
            }
            KeyCode::Backspace => self.session.pop_search_char(),
            KeyCode::Char(c) => self.session.push_search_char(c),
            _ => {}
        }
    }

    fn switch_view(&mut self, view: View) {
        self.session.set_view(view);
        self.scroll = 0;
        self.clamp_selected_field();
        self.status = format!("View: {}", view.display_name());
    }

    fn clamp_selected_field(&mut self) {
        let last = FilterField::visible(self.session.view()).len().saturating_sub(1);
        self.selected_field = self.selected_field.min(last);
    }

    fn adjust_field(&mut self, delta: i32) {
        let fields = FilterField::visible(self.session.view());
        let Some(&field) = fields.get(self.selected_field) else {
            return;
        };
        self.session.cycle_filter(field, delta);
        self.scroll = 0;
        self.status = format!(
            "{}: {}",
            field.label(),
            choice_label(field, self.session.filter_value(field))
        );
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view = self.session.view();
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("bls", Style::default().fg(Color::Cyan)),
            Span::raw(" | Bureau of Labor Statistics Data Explorer"),
        ]));

        let mut tabs = Vec::new();
        for (i, v) in View::ALL.iter().enumerate() {
            let label = format!(" {} {} ", i + 1, v.display_name());
            let style = if *v == view {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            tabs.push(Span::styled(label, style));
            tabs.push(Span::raw(" "));
        }
        lines.push(Line::from(tabs));

        lines.push(Line::from(Span::styled(
            helper_text(view, self.session.derived().core_loaded),
            Style::default().fg(Color::Gray),
        )));

        let fetched = if self.session.is_loading() {
            "loading...".to_string()
        } else {
            self.session
                .fetched_at()
                .map(|t| format!("updated {}", t.format("%H:%M:%S")))
                .unwrap_or_else(|| "-".to_string())
        };
        lines.push(Line::from(Span::styled(
            format!(
                "years: {}-{} | records: {} | shown: {} | {fetched}",
                self.config.start_year,
                self.config.end_year,
                self.session.records().len(),
                self.session.derived().filtered.len(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(38), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(columns[0]);
        self.draw_search(frame, left[0]);
        self.draw_filters(frame, left[1]);

        let problems = self.problem_lines();
        let mut constraints = Vec::new();
        if !problems.is_empty() {
            constraints.push(Constraint::Length((problems.len() as u16 + 2).min(8)));
        }
        if self.session.show_records() {
            constraints.push(Constraint::Percentage(40));
            constraints.push(Constraint::Min(0));
        } else {
            constraints.push(Constraint::Min(0));
        }
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(columns[1]);

        let mut idx = 0;
        if !problems.is_empty() {
            self.draw_problems(frame, right[idx], problems);
            idx += 1;
        }
        self.draw_statistics(frame, right[idx]);
        if self.session.show_records() {
            self.draw_records(frame, right[idx + 1]);
        }
    }

    fn draw_search(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let style = if self.editing_search {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let text = if self.editing_search {
            format!("{}_", self.session.search_text())
        } else {
            self.session.search_text().to_string()
        };
        let p = Paragraph::new(text)
            .style(style)
            .block(Block::default().title("Search (/)").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = FilterField::visible(self.session.view())
            .iter()
            .map(|&field| {
                ListItem::new(format!(
                    "{}: {}",
                    field.label(),
                    choice_label(field, self.session.filter_value(field))
                ))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    /// Error headline plus per-series failures.
    fn problem_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if let Some(err) = self.session.error() {
            lines.push(Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }
        for d in self.session.diagnostics() {
            lines.push(Line::from(Span::styled(
                format!("- {d}"),
                Style::default().fg(Color::Yellow),
            )));
        }
        lines
    }

    fn draw_problems(&self, frame: &mut ratatui::Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
        let title = if self.session.error().is_some() { "Error" } else { "Details" };
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_statistics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let derived = self.session.derived();
        let title = if self.session.show_records() {
            "Statistics".to_string()
        } else {
            format!("Statistics ({} records, g to show)", derived.filtered.len())
        };
        let block = Block::default().title(title).borders(Borders::ALL);

        let Some(stats) = &derived.statistics else {
            let msg = if self.session.is_loading() {
                "Loading BLS data..."
            } else {
                "No data available for the current filters."
            };
            let p = Paragraph::new(msg).style(Style::default().fg(Color::Yellow)).block(block);
            frame.render_widget(p, area);
            return;
        };

        let width = area.width.saturating_sub(4) as usize;
        let mut lines = Vec::new();
        for entry in stats.iter() {
            let s = &entry.stats;
            let unit = &entry.unit;
            lines.push(Line::from(Span::styled(
                truncate(&entry.name, width.max(8)),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!(
                "  n={}  avg {:.2}  median {:.2}  mode {:.2}  range {:.2} - {:.2} {unit}",
                s.total_count, s.average, s.median, s.mode, s.min, s.max,
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(p, area);
    }

    fn draw_records(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let records = &self.session.derived().filtered;
        let block = Block::default()
            .title(format!("Records ({}) PgUp/PgDn", records.len()))
            .borders(Borders::ALL);

        if records.is_empty() {
            let p = Paragraph::new("No data available for the current filters.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(p, area);
            return;
        }

        let mut lines = Vec::new();
        for r in records {
            lines.push(Line::from(vec![
                Span::styled(r.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", category_badge(r.category)),
                    Style::default().fg(Color::Magenta),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} {}", r.raw_value, r.unit),
                    Style::default().fg(Color::Green),
                ),
                Span::raw("  "),
                Span::styled(period_caption(r), Style::default().fg(Color::Gray)),
            ]));
            for note in &r.footnotes {
                lines.push(Line::from(Span::styled(
                    format!("  * {}", note.text),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        let p = Paragraph::new(Text::from(lines))
            .scroll((self.scroll, 0))
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/1-3 view  ↑/↓ select  ←/→ adjust  / search  c reset  g records  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// One-line hint under the tabs.
fn helper_text(view: View, core_loaded: bool) -> String {
    match view {
        View::National => "Summary statistics for national indicators. Press g to view the detailed records.".to_string(),
        View::States => "Pick a state to view its unemployment rate and nonfarm employment data.".to_string(),
        View::All => {
            let mut text = "Key national indicators. Pick the States tab or search a state name for state data.".to_string();
            if !core_loaded {
                text.push_str(" Some key indicators may still be loading.");
            }
            text
        }
    }
}

/// Display text for a filter value; periods render as `Month 01`.
fn choice_label(field: FilterField, value: Option<&str>) -> String {
    match (field, value) {
        (_, None) => "All".to_string(),
        (FilterField::Period, Some(p)) => period_label(p),
        (_, Some(v)) => v.to_string(),
    }
}
