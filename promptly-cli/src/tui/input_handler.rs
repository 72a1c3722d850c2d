use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use promptly_core::TemplateRegistry;
use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};

use super::state::TuiState;
use super::theme::Palette;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiAction {
    /// Enhance the given text. Edits stay in the textarea until then.
    Submit(String),
    /// A slash command typed into the input.
    Command(String),
    Regenerate,
    SelectTemplate(String),
    Clear,
    Copy,
    ToggleTheme,
    /// Cancel the in-flight enhancement.
    Cancel,
    Quit,
    None,
}

pub fn handle_key_event(key: KeyEvent, textarea: &mut TextArea, state: &mut TuiState) -> TuiAction {
    state.show_help = false;

    match (key.code, key.modifiers) {
        // Ctrl+C: cancel if busy, quit if idle
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
            if state.busy {
                TuiAction::Cancel
            } else {
                TuiAction::Quit
            }
        }

        (KeyCode::Char('d'), m) if m.contains(KeyModifiers::CONTROL) => TuiAction::Quit,

        (KeyCode::Enter, KeyModifiers::NONE) => {
            let text = textarea.lines().join("\n");
            if text.trim_start().starts_with('/') {
                // Commands never replace the prompt the session holds
                restore_textarea(textarea, state.raw_input(), state.palette());
                state.input_lines = textarea.lines().len();
                return TuiAction::Command(text);
            }
            TuiAction::Submit(text)
        }

        // Shift+Enter or Alt+Enter: insert newline
        (KeyCode::Enter, m) if m.contains(KeyModifiers::SHIFT) || m.contains(KeyModifiers::ALT) => {
            textarea.insert_newline();
            state.input_lines = textarea.lines().len();
            TuiAction::None
        }

        (KeyCode::Tab, _) => {
            let current = state.selected_template().map_or("", |t| t.id.as_str());
            let next = TemplateRegistry::builtin().next_after(current);
            TuiAction::SelectTemplate(next.id.to_string())
        }

        (KeyCode::F(n @ 1..=4), _) => state
            .templates
            .get(usize::from(n) - 1)
            .map_or(TuiAction::None, |t| TuiAction::SelectTemplate(t.id.clone())),

        (KeyCode::Char('r'), m) if m.contains(KeyModifiers::CONTROL) => {
            if state.can_regenerate() {
                TuiAction::Regenerate
            } else {
                TuiAction::None
            }
        }

        (KeyCode::Char('y'), m) if m.contains(KeyModifiers::CONTROL) => TuiAction::Copy,

        (KeyCode::Char('t'), m) if m.contains(KeyModifiers::CONTROL) => TuiAction::ToggleTheme,

        (KeyCode::Char('o'), m) if m.contains(KeyModifiers::CONTROL) => {
            state.show_comparison = !state.show_comparison;
            TuiAction::None
        }

        (KeyCode::Char('l'), m) if m.contains(KeyModifiers::CONTROL) => {
            reset_textarea(textarea, state.palette());
            state.input_lines = 1;
            TuiAction::Clear
        }

        (KeyCode::Esc, _) => {
            if state.busy {
                TuiAction::Cancel
            } else {
                TuiAction::None
            }
        }

        (KeyCode::PageUp, _) => {
            state.scroll_up(10);
            TuiAction::None
        }

        (KeyCode::PageDown, _) => {
            state.scroll_down(10);
            TuiAction::None
        }

        // All other keys: forward to textarea
        _ => {
            if textarea.input(key) {
                state.input_lines = textarea.lines().len();
            }
            TuiAction::None
        }
    }
}

pub fn reset_textarea(textarea: &mut TextArea, palette: Palette) {
    *textarea = TextArea::default();
    configure_textarea(textarea, palette);
}

/// Replaces the input with `text`, cursor at the end.
pub fn restore_textarea(textarea: &mut TextArea, text: &str, palette: Palette) {
    if text.is_empty() {
        reset_textarea(textarea, palette);
        return;
    }
    *textarea = TextArea::from(text.lines());
    configure_textarea(textarea, palette);
    textarea.move_cursor(CursorMove::Bottom);
    textarea.move_cursor(CursorMove::End);
}

pub fn configure_textarea(textarea: &mut TextArea, palette: Palette) {
    textarea.set_placeholder_text(
        "Describe what you want... (Enter to enhance, Shift+Enter for new line)",
    );
    textarea.set_placeholder_style(Style::default().fg(palette.muted));
    textarea.set_cursor_line_style(Style::default());
    textarea.set_style(Style::default().fg(palette.text).bg(palette.background));
}
