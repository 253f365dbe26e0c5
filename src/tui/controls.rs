//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Left => app.shift_focused(-1),
        KeyCode::Right => app.shift_focused(1),
        KeyCode::Char('[') => app.pan(-1),
        KeyCode::Char(']') => app.pan(1),
        KeyCode::Char('d') => app.reset_range(),
        KeyCode::Char('r') => app.reload(),
        _ => {}
    }
}
