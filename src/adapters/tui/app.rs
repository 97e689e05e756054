use color_eyre::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{
    event::{AppEvent, EventHandler},
    widgets::InputBar,
};
use crate::adapters::effects::EffectsEngine;
use crate::application::{AppResult, Change, Intent, ListView, StateManager, TaskRow};
use crate::domain::{TaskEvent, TaskFilter, TaskId};
use crate::ports::{AppConfig, ConfigStore};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Adding,
    Editing(TaskId),
    Help,
}

/// Result of a spawned intent, sent back to the UI loop for committing.
struct Outcome {
    intent: &'static str,
    reload: bool,
    result: AppResult<Option<Change>>,
}

pub struct App {
    state_manager: StateManager,
    config: AppConfig,
    config_store: Arc<dyn ConfigStore>,

    // Effects
    effects: EffectsEngine,
    effect_events: UnboundedReceiver<TaskEvent>,

    // In-flight store calls
    outcomes_tx: UnboundedSender<Outcome>,
    outcomes_rx: UnboundedReceiver<Outcome>,
    in_flight: usize,
    is_loading: bool,

    // UI State
    mode: AppMode,
    input: InputBar,
    editor: InputBar,
    view: ListView,
    task_list_state: TableState,
}

impl App {
    pub fn new(
        state_manager: StateManager,
        effects: EffectsEngine,
        effect_events: UnboundedReceiver<TaskEvent>,
        config: AppConfig,
        config_store: Arc<dyn ConfigStore>,
    ) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        let view = state_manager.view();

        Self {
            state_manager,
            config,
            config_store,
            effects,
            effect_events,
            outcomes_tx,
            outcomes_rx,
            in_flight: 0,
            is_loading: false,
            mode: AppMode::Normal,
            input: InputBar::new(),
            editor: InputBar::new(),
            view,
            task_list_state: TableState::default(),
        }
    }

    pub fn initialize(&mut self) {
        self.is_loading = true;
        self.dispatch(Intent::Load);
    }

    /// Filter changes apply immediately; everything else runs in the
    /// background and is committed when its result comes back. Nothing guards
    /// against overlapping requests: results land in completion order.
    fn dispatch(&mut self, intent: Intent) {
        if let Intent::SetFilter(filter) = intent {
            self.state_manager.commit(Change::FilterChanged(filter));
            self.refresh_view();
            return;
        }

        let service = self.state_manager.service();
        let tx = self.outcomes_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let name = intent.name();
            let reload = matches!(intent, Intent::Load);
            let result = service.execute(intent).await;
            let _ = tx.send(Outcome {
                intent: name,
                reload,
                result,
            });
        });
    }

    /// Commit finished requests and feed emitted events to the effects.
    pub fn drain(&mut self, now: Instant) {
        let mut changed = false;
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            if outcome.reload {
                self.is_loading = false;
            }

            match outcome.result {
                Ok(Some(change)) => {
                    // The typed text survives until the server has it
                    if matches!(change, Change::Created(_)) {
                        self.input.clear();
                    }
                    self.state_manager.commit(change);
                    changed = true;
                }
                Ok(None) => {}
                Err(e) => tracing::error!("{} failed: {}", outcome.intent, e),
            }
        }
        if changed {
            self.refresh_view();
        }

        while let Ok(event) = self.effect_events.try_recv() {
            self.effects.handle(&event, now);
        }
        self.effects.tick(now);
    }

    fn refresh_view(&mut self) {
        self.view = self.state_manager.view();

        let len = self.view.rows.len();
        match self.task_list_state.selected() {
            _ if len == 0 => self.task_list_state.select(None),
            None => self.task_list_state.select(Some(0)),
            Some(selected) if selected >= len => self.task_list_state.select(Some(len - 1)),
            Some(_) => {}
        }

        // The edited task may have vanished from the view
        if let AppMode::Editing(id) = &self.mode {
            if !self.view.rows.iter().any(|row| &row.id == id) {
                self.editor.clear();
                self.mode = AppMode::Normal;
            }
        }
    }

    fn selected_row(&self) -> Option<&TaskRow> {
        self.task_list_state
            .selected()
            .and_then(|i| self.view.rows.get(i))
    }

    fn set_filter(&mut self, filter: TaskFilter) {
        if let Some(tab) = self.view.filters.iter().find(|tab| tab.filter == filter) {
            let intent = tab.select();
            self.dispatch(intent);
        }
    }

    fn toggle_sounds(&mut self) {
        let enabled = self.effects.toggle_sounds();
        self.config.sounds_enabled = enabled;
        tracing::info!("Sounds {}", if enabled { "on" } else { "off" });

        let store = self.config_store.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            if let Err(e) = store.save_config(&config).await {
                tracing::warn!("Failed to save sound preference: {}", e);
            }
        });
    }

    /// Returns true when the app should quit.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        if event == AppEvent::Quit {
            return true;
        }

        match self.mode.clone() {
            AppMode::Help => {
                if event != AppEvent::Tick {
                    self.mode = AppMode::Normal;
                }
                false
            }
            AppMode::Adding => {
                self.handle_adding(event);
                false
            }
            AppMode::Editing(id) => {
                self.handle_editing(id, event);
                false
            }
            AppMode::Normal => self.handle_normal(event),
        }
    }

    fn handle_normal(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Character(c) => match c {
                'q' => return true,
                'a' | 'i' => {
                    self.mode = AppMode::Adding;
                    self.input.set_focused(true);
                }
                'e' => self.start_editing(),
                ' ' => {
                    if let Some(intent) = self.selected_row().map(TaskRow::toggle) {
                        self.dispatch(intent);
                    }
                }
                'd' => {
                    if let Some(intent) = self.selected_row().map(TaskRow::delete) {
                        self.dispatch(intent);
                    }
                }
                'c' => {
                    if let Some(intent) = self.view.clear_completed.clone() {
                        self.dispatch(intent);
                    }
                }
                '1' => self.set_filter(TaskFilter::All),
                '2' => self.set_filter(TaskFilter::Active),
                '3' => self.set_filter(TaskFilter::Completed),
                'f' => self.set_filter(self.view.active_filter().next()),
                's' => self.toggle_sounds(),
                'r' => {
                    self.is_loading = true;
                    self.dispatch(Intent::Load);
                }
                'j' => self.next_task(),
                'k' => self.previous_task(),
                'g' => self.first_task(),
                'G' => self.last_task(),
                '?' => self.mode = AppMode::Help,
                _ => {}
            },
            AppEvent::Enter => self.start_editing(),
            AppEvent::Tab => self.set_filter(self.view.active_filter().next()),
            AppEvent::BackTab => self.set_filter(self.view.active_filter().previous()),
            AppEvent::NextTask => self.next_task(),
            AppEvent::PreviousTask => self.previous_task(),
            AppEvent::FirstTask => self.first_task(),
            AppEvent::LastTask => self.last_task(),
            _ => {}
        }
        false
    }

    fn handle_adding(&mut self, event: AppEvent) {
        match event {
            AppEvent::Enter => {
                // Blank submissions stay in the box and never reach the store
                if self.input.value().trim().is_empty() {
                    return;
                }
                let text = self.input.value().to_string();
                self.dispatch(Intent::Add { text });
            }
            AppEvent::CloseModal | AppEvent::Tab => {
                self.mode = AppMode::Normal;
                self.input.set_focused(false);
            }
            other => edit_text(&mut self.input, other),
        }
    }

    fn start_editing(&mut self) {
        if let Some(row) = self.selected_row() {
            let (id, text) = (row.id.clone(), row.text.clone());
            self.editor.set_value(&text);
            self.mode = AppMode::Editing(id);
        }
    }

    fn handle_editing(&mut self, id: TaskId, event: AppEvent) {
        match event {
            AppEvent::Enter => {
                let intent = self
                    .view
                    .rows
                    .iter()
                    .find(|row| row.id == id)
                    .map(|row| row.edit(self.editor.value()));
                // Blank edits are dropped by the service, which reverts the row
                if let Some(intent) = intent {
                    self.dispatch(intent);
                }
                self.editor.clear();
                self.mode = AppMode::Normal;
            }
            AppEvent::CloseModal => {
                self.editor.clear();
                self.mode = AppMode::Normal;
            }
            other => edit_text(&mut self.editor, other),
        }
    }

    fn next_task(&mut self) {
        if self.view.rows.is_empty() {
            return;
        }

        let current = self.task_list_state.selected().unwrap_or(0);
        let next = if current >= self.view.rows.len() - 1 {
            0
        } else {
            current + 1
        };
        self.task_list_state.select(Some(next));
    }

    fn previous_task(&mut self) {
        if self.view.rows.is_empty() {
            return;
        }

        let current = self.task_list_state.selected().unwrap_or(0);
        let previous = if current == 0 {
            self.view.rows.len() - 1
        } else {
            current - 1
        };
        self.task_list_state.select(Some(previous));
    }

    fn first_task(&mut self) {
        if !self.view.rows.is_empty() {
            self.task_list_state.select(Some(0));
        }
    }

    fn last_task(&mut self) {
        if !self.view.rows.is_empty() {
            self.task_list_state.select(Some(self.view.rows.len() - 1));
        }
    }

    pub fn render(&mut self, frame: &mut Frame, now: Instant) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // New task input
                Constraint::Min(0),    // Task list
                Constraint::Length(1), // Counter, filters, clear
                Constraint::Length(1), // Key help
            ])
            .split(frame.area());

        self.input.render(frame, chunks[0]);
        self.render_task_list(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);
        self.render_status_bar(frame, chunks[3]);

        if self.effects.is_animating() {
            frame.render_widget(self.effects.overlay(now), frame.area());
        }

        if self.mode == AppMode::Help {
            self.render_help(frame);
        }
    }

    fn render_task_list(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.in_flight > 0 {
            format!("Todos ({}) syncing...", self.view.rows.len())
        } else {
            format!("Todos ({})", self.view.rows.len())
        };
        let border_style = if self.input.is_focused() {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::Green)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        if self.view.rows.is_empty() {
            let message = if self.is_loading {
                "Loading tasks..."
            } else {
                self.view.empty_message()
            };
            let paragraph = Paragraph::new(message)
                .block(block)
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(paragraph, area);
            return;
        }

        let editing = match &self.mode {
            AppMode::Editing(id) => Some(id),
            _ => None,
        };

        let rows: Vec<Row> = self
            .view
            .rows
            .iter()
            .map(|row| {
                let text_cell = if editing == Some(&row.id) {
                    Cell::from(self.editor.value().to_string())
                        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED))
                } else if row.completed {
                    Cell::from(row.text.as_str()).style(
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT),
                    )
                } else {
                    Cell::from(row.text.as_str())
                };

                Row::new(vec![
                    Cell::from(row.checkbox()).style(Style::default().fg(Color::Cyan)),
                    text_cell,
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            &[
                Constraint::Length(3), // Checkbox column
                Constraint::Min(20),   // Text column (flexible)
            ],
        )
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("");

        frame.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(self.view.remaining_label(), Style::default().fg(Color::White)),
            Span::raw("   "),
        ];

        for tab in &self.view.filters {
            let style = if tab.active {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", tab.label()), style));
            spans.push(Span::raw(" "));
        }

        let clear_style = if self.view.clear_completed.is_some() {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled("Clear completed (c)", clear_style));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let help_text = match self.mode {
            AppMode::Adding => "Enter: add | Esc/Tab: back to list",
            AppMode::Editing(_) => "Enter: save | Esc: cancel",
            AppMode::Help => "Press any key to close help",
            AppMode::Normal => {
                if self.effects.sounds_enabled() {
                    "a: add | Space: toggle | e: edit | d: delete | c: clear | 1-3/Tab: filter | s: sounds (on) | ?: help | q: quit"
                } else {
                    "a: add | Space: toggle | e: edit | d: delete | c: clear | 1-3/Tab: filter | s: sounds (off) | ?: help | q: quit"
                }
            }
        };

        let paragraph = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame) {
        let popup_area = Self::centered_rect(60, 70, frame.area());

        frame.render_widget(ratatui::widgets::Clear, popup_area);

        let help_text = vec![
            "Todo Help",
            "",
            "List:",
            "  j/k or ↑/↓     - Move up/down",
            "  g/G            - First/last task",
            "  Space          - Toggle completed",
            "  e or Enter     - Edit task text (blank text is discarded)",
            "  d              - Delete task",
            "  c              - Clear all completed tasks",
            "",
            "Filters:",
            "  1 / 2 / 3      - All / Active / Completed",
            "  Tab, f         - Next filter",
            "  Shift+Tab      - Previous filter",
            "",
            "Adding:",
            "  a or i         - Focus the new task box",
            "  Enter          - Add the task",
            "  Esc            - Back to the list",
            "",
            "General:",
            "  s              - Toggle sounds",
            "  r              - Reload from server",
            "  ?              - Show this help",
            "  q              - Quit",
            "  Ctrl+C         - Force quit application",
            "",
            "Press any key to close this help",
        ]
        .join("\n");

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }

    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

fn edit_text(input: &mut InputBar, event: AppEvent) {
    match event {
        AppEvent::Character(c) => input.insert_char(c),
        AppEvent::Backspace => input.delete_char(),
        AppEvent::Delete => input.delete_forward(),
        AppEvent::Left => input.move_left(),
        AppEvent::Right => input.move_right(),
        AppEvent::Home => input.move_home(),
        AppEvent::End => input.move_end(),
        _ => {}
    }
}

pub async fn run_tui(mut app: App) -> Result<()> {
    // color-eyre is already initialized in main.rs

    // Set up terminal
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.initialize();

    // Event handling
    let mut event_handler = EventHandler::new();

    let result = async {
        loop {
            let now = Instant::now();
            app.drain(now);
            terminal.draw(|frame| app.render(frame, now))?;

            let event = event_handler.next_event().await?;
            if app.handle_event(event) || event_handler.should_quit() {
                break;
            }
        }
        Ok::<(), color_eyre::Report>(())
    }
    .await;

    // Cleanup
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;

    result
}
