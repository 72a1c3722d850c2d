use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};
use tui_textarea::TextArea;

use super::state::TuiState;
use super::widgets::{input_area, mode_bar, output_panel, status_bar};

pub fn draw_ui(frame: &mut Frame, state: &mut TuiState, textarea: &TextArea) {
    let palette = state.palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        frame.area(),
    );

    let input_height = input_area::height_for(state.input_lines.max(textarea.lines().len()));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // Mode tabs + description
            Constraint::Length(input_height), // Input area (grows with content)
            Constraint::Min(3),               // Output panel (fills remaining space)
            Constraint::Length(1),            // Status bar
        ])
        .split(frame.area());

    mode_bar::render(frame, chunks[0], state);
    input_area::render(frame, chunks[1], textarea, palette);
    output_panel::render(frame, chunks[2], state);
    status_bar::render(frame, chunks[3], state);
}
