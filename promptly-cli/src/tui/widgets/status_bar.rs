use promptly_core::controller::PhaseKind;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Instant;

use crate::clipboard::CopyStatus;
use crate::tui::state::TuiState;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let palette = state.palette();
    let (status, status_color) = status_text(state, Instant::now());

    let sep = Span::styled(" | ", Style::default().fg(palette.muted));

    let provider = match &state.provider {
        Some(p) => Span::styled(p.clone(), Style::default().fg(palette.success)),
        None => Span::styled("no API key", Style::default().fg(palette.error)),
    };
    let mode = state
        .selected_template()
        .map(|t| t.name.clone())
        .unwrap_or_default();

    let mut parts: Vec<Span<'static>> = vec![
        Span::raw(" "),
        provider,
        sep.clone(),
        Span::styled(mode, Style::default().fg(palette.accent)),
    ];

    if let Some(usage) = state.snapshot.as_ref().and_then(|s| s.last_usage) {
        parts.push(sep.clone());
        parts.push(Span::styled(
            format!("{} in / {} out", usage.input_tokens, usage.output_tokens),
            Style::default().fg(palette.text),
        ));
    }

    if state.show_comparison {
        parts.push(sep.clone());
        parts.push(Span::styled("compare", Style::default().fg(palette.muted)));
    }

    parts.push(sep);
    parts.push(Span::styled(status, Style::default().fg(status_color)));

    let bar = Paragraph::new(Line::from(parts))
        .style(Style::default().bg(palette.bar_background));

    frame.render_widget(bar, area);
}

/// Busy spinner first, then a fresh copy outcome, then any notice, then the
/// phase.
fn status_text(state: &TuiState, now: Instant) -> (String, ratatui::style::Color) {
    let palette = state.palette();

    if state.busy {
        let spinner = SPINNER_CHARS[state.spinner_frame % SPINNER_CHARS.len()];
        return (format!("{spinner} Enhancing..."), palette.accent);
    }

    if let Some(copy) = state.copy_status(now) {
        let color = match copy {
            CopyStatus::Copied => palette.success,
            CopyStatus::Failed => palette.error,
        };
        return (copy.label().to_string(), color);
    }

    if let Some(notice) = &state.notice {
        let color = if notice.is_error {
            palette.error
        } else {
            palette.text
        };
        return (notice.text.clone(), color);
    }

    match state.phase() {
        PhaseKind::Succeeded => ("Done".to_string(), palette.success),
        PhaseKind::Failed => ("Failed".to_string(), palette.error),
        PhaseKind::Idle | PhaseKind::Pending => ("Ready".to_string(), palette.success),
    }
}
