use ratatui::{
    layout::Rect,
    style::Style,
    symbols::border,
    text::Span,
    widgets::{Block, Borders},
    Frame,
};
use tui_textarea::TextArea;

use crate::tui::theme::Palette;

/// Input height for `line_count` lines: grows with content up to ten lines,
/// plus the two border rows.
pub fn height_for(line_count: usize) -> u16 {
    line_count.clamp(1, 10) as u16 + 2
}

pub fn render(frame: &mut Frame, area: Rect, textarea: &TextArea, palette: Palette) {
    // Top and bottom borders only (no left/right)
    let border_set = border::Set {
        top_left: "─",
        top_right: "─",
        bottom_left: "─",
        bottom_right: "─",
        ..border::PLAIN
    };

    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_set(border_set)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(" Prompt ", Style::default().fg(palette.muted)));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(textarea, inner);
}
