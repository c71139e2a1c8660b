//! Keyboard and resize events from the terminal.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    Resize(u16, u16),
}

/// `q`, `Esc` and `Ctrl-C` quit. Raw mode swallows SIGINT, so `Ctrl-C`
/// arrives here as a key.
pub fn should_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

pub fn classify(event: &Event) -> Option<Input> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press && should_quit(*key) => Some(Input::Quit),
        Event::Resize(w, h) => Some(Input::Resize(*w, *h)),
        _ => None,
    }
}

/// Waits up to `timeout` for one event that matters.
pub fn poll(timeout: Duration) -> Result<Option<Input>> {
    if event::poll(timeout)? {
        let event = event::read()?;
        return Ok(classify(&event));
    }
    Ok(None)
}
