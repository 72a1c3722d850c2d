use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::tui::state::TuiState;

/// Mode tabs on the first row, the selected mode's description below.
pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let palette = state.palette();
    let [tabs_area, description_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let titles: Vec<Line<'static>> = state
        .templates
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("F{} {}", i + 1, t.name)))
        .collect();

    let tabs = Tabs::new(titles)
        .select(state.selected_index())
        .style(Style::default().fg(palette.muted))
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled(" │ ", Style::default().fg(palette.border)));
    frame.render_widget(tabs, tabs_area);

    let description = state
        .selected_template()
        .map(|t| t.description.clone())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {description}"),
            Style::default().fg(palette.muted),
        )),
        description_area,
    );
}
