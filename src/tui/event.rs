use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use log::{debug, warn};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Session-level commands
    ForceQuit, // Ctrl+C
    Escape,
    Submit,       // Enter
    NewChat,      // Ctrl+N
    ClearHistory, // Ctrl+L
    ToggleHistory, // Ctrl+O
    CopySql,       // Ctrl+Y
    PickExample(usize), // F1..F4 on the landing page

    // Input editing
    InputChar(char),
    Newline, // Shift+Enter, Alt+Enter, Ctrl+J
    Paste(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,

    // Message list
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,

    // History panel selection
    HistoryPrev, // Alt+Up, towards newer entries
    HistoryNext, // Alt+Down, towards older entries

    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(Event::Key(key_event)) => map_key(key_event),
        Ok(Event::Mouse(mouse_event)) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Ok(Event::Paste(data)) => Some(TuiEvent::Paste(data)),
        Ok(Event::Resize(_, _)) => Some(TuiEvent::Resize),
        Ok(_) => None,
        Err(e) => {
            warn!("Event read failed: {}", e);
            None
        }
    }
}

/// Translate a key press. Enter submits unless a modifier asks for a line break.
pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Keyboard enhancement reports releases too; only presses and repeats count.
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code, key_event.modifiers
    );
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);
    match key_event.code {
        KeyCode::Char('c') if ctrl => Some(TuiEvent::ForceQuit),
        KeyCode::Char('n') if ctrl => Some(TuiEvent::NewChat),
        KeyCode::Char('l') if ctrl => Some(TuiEvent::ClearHistory),
        KeyCode::Char('o') if ctrl => Some(TuiEvent::ToggleHistory),
        KeyCode::Char('y') if ctrl => Some(TuiEvent::CopySql),
        // Ctrl+J is ASCII LF; Ctrl+Enter sends this in most terminals
        KeyCode::Char('j') if ctrl => Some(TuiEvent::Newline),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Enter
            if key_event
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            Some(TuiEvent::Newline)
        }
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::Up if alt => Some(TuiEvent::HistoryPrev),
        KeyCode::Down if alt => Some(TuiEvent::HistoryNext),
        KeyCode::Up => Some(TuiEvent::ScrollUp),
        KeyCode::Down => Some(TuiEvent::ScrollDown),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        KeyCode::F(n @ 1..=4) => Some(TuiEvent::PickExample(n as usize - 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn plain_enter_submits() {
        assert_eq!(
            map_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(TuiEvent::Submit)
        );
    }

    #[test]
    fn line_break_keys_insert_newline() {
        assert_eq!(
            map_key(key(KeyCode::Enter, KeyModifiers::SHIFT)),
            Some(TuiEvent::Newline)
        );
        assert_eq!(
            map_key(key(KeyCode::Enter, KeyModifiers::ALT)),
            Some(TuiEvent::Newline)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(TuiEvent::Newline)
        );
    }

    #[test]
    fn control_shortcuts() {
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(TuiEvent::ForceQuit)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(TuiEvent::NewChat)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(TuiEvent::ClearHistory)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('o'), KeyModifiers::CONTROL)),
            Some(TuiEvent::ToggleHistory)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('y'), KeyModifiers::CONTROL)),
            Some(TuiEvent::CopySql)
        );
        assert_eq!(map_key(key(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn alt_arrows_move_history_selection() {
        assert_eq!(
            map_key(key(KeyCode::Up, KeyModifiers::ALT)),
            Some(TuiEvent::HistoryPrev)
        );
        assert_eq!(
            map_key(key(KeyCode::Down, KeyModifiers::ALT)),
            Some(TuiEvent::HistoryNext)
        );
        assert_eq!(
            map_key(key(KeyCode::Up, KeyModifiers::NONE)),
            Some(TuiEvent::ScrollUp)
        );
    }

    #[test]
    fn function_keys_pick_examples() {
        assert_eq!(
            map_key(key(KeyCode::F(1), KeyModifiers::NONE)),
            Some(TuiEvent::PickExample(0))
        );
        assert_eq!(map_key(key(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn key_release_ignored() {
        let mut release = key(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }
}
