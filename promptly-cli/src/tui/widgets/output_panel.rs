use promptly_core::controller::PhaseKind;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use crate::commands::HELP_TEXT;
use crate::tui::state::TuiState;
use crate::tui::theme::Palette;

const EMPTY_HINT: &str = "Your enhanced prompt will appear here.";
const KEY_HINTS: &str = "Tab/F1-F4 mode  Ctrl+R regenerate  Ctrl+Y copy  Ctrl+O compare  \
Ctrl+T theme  Ctrl+L clear  /help commands";

pub fn render(frame: &mut Frame, area: Rect, state: &mut TuiState) {
    let palette = state.palette();

    if state.show_help {
        let lines = text_lines(HELP_TEXT, Style::default().fg(palette.text));
        render_scrolled(frame, area, state, lines, "Help", palette);
        return;
    }

    let result = state.result_text().map(str::to_string);
    match (result, state.show_comparison) {
        (Some(result), true) => {
            let original = state.raw_input().to_string();
            render_comparison(frame, area, state, &original, &result, palette);
        }
        (Some(result), false) => {
            let lines = text_lines(&result, Style::default().fg(palette.text));
            render_scrolled(frame, area, state, lines, "Enhanced prompt", palette);
        }
        (None, _) => {
            let lines = status_lines(state, palette);
            render_scrolled(frame, area, state, lines, "Enhanced prompt", palette);
        }
    }
}

/// Body shown when there is no result: pending, error or the idle hint.
fn status_lines(state: &TuiState, palette: Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match state.phase() {
        PhaseKind::Pending => {
            let mode = state
                .selected_template()
                .map(|t| t.name.clone())
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("Enhancing with {mode}..."),
                Style::default().fg(palette.accent),
            )));
        }
        PhaseKind::Failed => {
            let message = state
                .snapshot
                .as_ref()
                .and_then(|s| s.error_message.clone())
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(
                message,
                Style::default()
                    .fg(palette.error)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        PhaseKind::Idle | PhaseKind::Succeeded => {
            lines.push(Line::from(Span::styled(
                EMPTY_HINT,
                Style::default().fg(palette.muted),
            )));
        }
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        KEY_HINTS,
        Style::default().fg(palette.muted),
    )));
    lines
}

fn render_scrolled(
    frame: &mut Frame,
    area: Rect,
    state: &mut TuiState,
    lines: Vec<Line<'static>>,
    title: &str,
    palette: Palette,
) {
    let block = panel_block(title, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Reserve 1 column on the right for the scrollbar so it doesn't overwrite text
    let text_area = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };

    let total_wrapped = compute_wrapped_line_count(&lines, text_area.width);
    let max_scroll = total_wrapped.saturating_sub(inner.height);

    // Store max_scroll so input_handler can clamp
    state.max_scroll = max_scroll;
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    frame.render_widget(paragraph, text_area);

    if total_wrapped > inner.height {
        let mut scrollbar_state =
            ScrollbarState::new(max_scroll as usize).position(state.scroll_offset as usize);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
    }
}

fn render_comparison(
    frame: &mut Frame,
    area: Rect,
    state: &mut TuiState,
    original: &str,
    enhanced: &str,
    palette: Palette,
) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    let before = text_lines(original, Style::default().fg(palette.muted));
    let after = text_lines(enhanced, Style::default().fg(palette.text));

    let left_block = panel_block("Original", palette);
    let right_block = panel_block("Enhanced", palette).border_style(Style::default().fg(palette.success));
    let left_inner = left_block.inner(left);
    let right_inner = right_block.inner(right);

    // Both columns scroll together, bounded by the longer one
    let tallest = compute_wrapped_line_count(&before, left_inner.width)
        .max(compute_wrapped_line_count(&after, right_inner.width));
    state.max_scroll = tallest.saturating_sub(right_inner.height);
    state.scroll_offset = state.scroll_offset.min(state.max_scroll);

    for (block, lines, column) in [(left_block, before, left), (right_block, after, right)] {
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((state.scroll_offset, 0));
        frame.render_widget(paragraph, column);
    }
}

fn panel_block(title: &str, palette: Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(palette.accent),
        ))
}

fn text_lines(text: &str, style: Style) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
}

/// Compute the number of visual lines after word wrapping.
fn compute_wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return lines.len() as u16;
    }
    let w = width as usize;
    let mut count: u16 = 0;
    for line in lines {
        let line_width = line.width();
        if line_width == 0 {
            count = count.saturating_add(1);
        } else {
            let wrapped = line_width.div_ceil(w) as u16;
            count = count.saturating_add(wrapped);
        }
    }
    count
}
