use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use color_eyre::Result;

/// Raw input, before the app decides what it means in the current mode.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Quit,
    CloseModal,

    // List navigation
    NextTask,
    PreviousTask,
    FirstTask,
    LastTask,

    // Input handling
    Character(char),
    Backspace,
    Delete,
    Enter,
    Left,
    Right,
    Home,
    End,
    Tab,
    BackTab,

    // Other
    Tick,
}

pub struct EventHandler {
    should_quit: bool,
    poll_interval: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            poll_interval: Duration::from_millis(100),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn next_event(&mut self) -> Result<AppEvent> {
        if event::poll(self.poll_interval)? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                    Ok(self.handle_key_event(key_event))
                }
                _ => Ok(AppEvent::Tick),
            }
        } else {
            Ok(AppEvent::Tick)
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> AppEvent {
        match key_event {
            // Global quit with Ctrl+C
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => {
                self.should_quit = true;
                AppEvent::Quit
            }

            KeyEvent {
                code: KeyCode::Esc, ..
            } => AppEvent::CloseModal,

            KeyEvent {
                code: KeyCode::Tab,
                modifiers: KeyModifiers::NONE,
                ..
            } => AppEvent::Tab,

            KeyEvent {
                code: KeyCode::BackTab,
                ..
            } => AppEvent::BackTab,

            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => AppEvent::Enter,

            // Arrow key navigation (always works)
            KeyEvent {
                code: KeyCode::Down,
                ..
            } => AppEvent::NextTask,

            KeyEvent {
                code: KeyCode::Up, ..
            } => AppEvent::PreviousTask,

            KeyEvent {
                code: KeyCode::PageUp,
                ..
            } => AppEvent::FirstTask,

            KeyEvent {
                code: KeyCode::PageDown,
                ..
            } => AppEvent::LastTask,

            KeyEvent {
                code: KeyCode::Left,
                ..
            } => AppEvent::Left,

            KeyEvent {
                code: KeyCode::Right,
                ..
            } => AppEvent::Right,

            KeyEvent {
                code: KeyCode::Home,
                ..
            } => AppEvent::Home,

            KeyEvent {
                code: KeyCode::End, ..
            } => AppEvent::End,

            // Input characters
            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::NONE,
                ..
            } => AppEvent::Character(c),

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::SHIFT,
                ..
            } => AppEvent::Character(c.to_uppercase().next().unwrap_or(c)),

            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => AppEvent::Backspace,

            KeyEvent {
                code: KeyCode::Delete,
                ..
            } => AppEvent::Delete,

            _ => AppEvent::Tick,
        }
    }
}
