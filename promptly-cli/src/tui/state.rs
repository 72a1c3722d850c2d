use promptly_core::controller::{PhaseKind, RequestSnapshot};
use promptly_core::session::TemplateInfo;
use std::time::Instant;

use super::theme::Palette;
use crate::clipboard::{CopyFeedback, CopyStatus};

/// A one-line message for the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

pub struct TuiState {
    /// Modes in display order, from `SessionStarted`.
    pub templates: Vec<TemplateInfo>,

    /// Latest snapshot of the session.
    pub snapshot: Option<RequestSnapshot>,

    /// Provider name, `None` when no API key was found.
    pub provider: Option<String>,

    pub dark_mode: bool,

    /// Whether an enhancement is in flight.
    pub busy: bool,

    /// Spinner animation frame counter.
    pub spinner_frame: usize,

    /// Line count of the input, drives the input area height.
    pub input_lines: usize,

    /// Show original and enhanced prompt side by side.
    pub show_comparison: bool,

    /// Show the command help in the output panel.
    pub show_help: bool,

    pub copy_feedback: Option<CopyFeedback>,

    pub notice: Option<Notice>,

    /// Scroll offset from the top of the output.
    pub scroll_offset: u16,

    /// Maximum scroll offset (computed during render).
    pub max_scroll: u16,

    /// Whether the app should exit.
    pub should_quit: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            snapshot: None,
            provider: None,
            dark_mode: true,
            busy: false,
            spinner_frame: 0,
            input_lines: 1,
            show_comparison: false,
            show_help: false,
            copy_feedback: None,
            notice: None,
            scroll_offset: 0,
            max_scroll: 0,
            should_quit: false,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.dark_mode)
    }

    pub fn selected_template(&self) -> Option<&TemplateInfo> {
        let id = &self.snapshot.as_ref()?.selected_template_id;
        self.templates.iter().find(|t| &t.id == id)
    }

    pub fn selected_index(&self) -> usize {
        let Some(snapshot) = &self.snapshot else {
            return 0;
        };
        self.templates
            .iter()
            .position(|t| t.id == snapshot.selected_template_id)
            .unwrap_or(0)
    }

    pub fn phase(&self) -> PhaseKind {
        self.snapshot
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(PhaseKind::Idle)
    }

    pub fn result_text(&self) -> Option<&str> {
        self.snapshot.as_ref()?.result_text.as_deref()
    }

    pub fn raw_input(&self) -> &str {
        self.snapshot
            .as_ref()
            .map(|s| s.raw_input.as_str())
            .unwrap_or_default()
    }

    pub fn can_regenerate(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(RequestSnapshot::can_regenerate)
    }

    pub fn record_copy(&mut self, status: CopyStatus, now: Instant) {
        self.copy_feedback = Some(CopyFeedback::new(status, now));
    }

    pub fn copy_status(&self, now: Instant) -> Option<CopyStatus> {
        self.copy_feedback.and_then(|f| f.current(now))
    }

    /// Drops the copy outcome once it has expired.
    pub fn expire_feedback(&mut self, now: Instant) {
        if self.copy_status(now).is_none() {
            self.copy_feedback = None;
        }
    }

    pub fn set_notice(&mut self, text: impl Into<String>, is_error: bool) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error,
        });
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(amount)
            .min(self.max_scroll);
    }
}
