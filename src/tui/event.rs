use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

use crate::core::action::Action;

/// Map one terminal event to an action. Only key presses are recognized.
pub fn decode_event(event: &Event) -> Action {
    match event {
        Event::Key(key_event) => decode_key(key_event),
        other => {
            debug!("Ignoring non-key event: {:?}", other);
            Action::Unknown
        }
    }
}

pub fn decode_key(key_event: &KeyEvent) -> Action {
    // Release/repeat events are reported by terminals with keyboard enhancement.
    if key_event.kind != KeyEventKind::Press {
        return Action::Unknown;
    }
    debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code, key_event.modifiers
    );
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Action::Quit,
        (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => Action::Quit,
        (_, KeyCode::Up) | (_, KeyCode::Char('k')) => Action::Up,
        (_, KeyCode::Down) | (_, KeyCode::Char('j')) => Action::Down,
        (_, KeyCode::Enter) | (_, KeyCode::Char(' ')) | (_, KeyCode::Char('l')) => Action::Select,
        (_, KeyCode::Right) => Action::Select,
        _ => Action::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent, MouseEventKind};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(decode_event(&press(KeyCode::Up)), Action::Up);
        assert_eq!(decode_event(&press(KeyCode::Char('k'))), Action::Up);
        assert_eq!(decode_event(&press(KeyCode::Down)), Action::Down);
        assert_eq!(decode_event(&press(KeyCode::Char('j'))), Action::Down);
    }

    #[test]
    fn test_select_and_quit_keys() {
        assert_eq!(decode_event(&press(KeyCode::Enter)), Action::Select);
        assert_eq!(decode_event(&press(KeyCode::Char(' '))), Action::Select);
        assert_eq!(decode_event(&press(KeyCode::Right)), Action::Select);
        assert_eq!(decode_event(&press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(decode_event(&press(KeyCode::Esc)), Action::Quit);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(decode_event(&ctrl_c), Action::Quit);
    }

    #[test]
    fn test_plain_c_is_unknown() {
        assert_eq!(decode_event(&press(KeyCode::Char('c'))), Action::Unknown);
    }

    #[test]
    fn test_release_and_non_key_events_are_unknown() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Down,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(decode_event(&release), Action::Unknown);
        assert_eq!(decode_event(&Event::Resize(80, 24)), Action::Unknown);
        let scroll = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(decode_event(&scroll), Action::Unknown);
    }
}
