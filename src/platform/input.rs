//! Keyboard decoding
//!
//! Raw crossterm events are read on a dedicated thread and forwarded as
//! decoded [`InputEvent`]s, so the game loop never blocks on terminal I/O.

use std::sync::mpsc;
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::Command;

/// What the input thread hands to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Command(Command),
    /// New terminal size (columns, rows)
    Resize(u16, u16),
}

/// Map a key press to a command. Releases and unbound keys map to `None`.
pub fn decode_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char(' ') | KeyCode::Up => Some(Command::Jump),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

pub fn decode_event(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => decode_key(key).map(InputEvent::Command),
        Event::Resize(cols, rows) => Some(InputEvent::Resize(*cols, *rows)),
        _ => None,
    }
}

/// Start the blocking reader thread. It exits when the receiver is dropped
/// or the terminal stops producing events.
pub fn spawn_input_thread() -> mpsc::Receiver<InputEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if let Some(decoded) = decode_event(&ev) {
                        if tx.send(decoded).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    log::error!("Input thread stopped: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(decode_key(&press(KeyCode::Char(' '))), Some(Command::Jump));
        assert_eq!(decode_key(&press(KeyCode::Up)), Some(Command::Jump));
        assert_eq!(decode_key(&press(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(decode_key(&press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(decode_key(&press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(decode_key(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(decode_key(&key), Some(Command::Quit));
        assert_eq!(decode_key(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut key = press(KeyCode::Char(' '));
        key.kind = KeyEventKind::Release;
        assert_eq!(decode_key(&key), None);
    }

    #[test]
    fn test_resize_event() {
        assert_eq!(
            decode_event(&Event::Resize(100, 30)),
            Some(InputEvent::Resize(100, 30))
        );
        assert_eq!(decode_event(&Event::FocusGained), None);
    }
}
