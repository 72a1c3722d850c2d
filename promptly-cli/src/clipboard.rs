use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::warn;

/// How long a copy outcome stays visible.
pub const COPY_STATUS_TTL: Duration = Duration::from_secs(2);

pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard. The `arboard` handle is opened lazily so headless
/// sessions only fail when the user actually copies.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("Clipboard unavailable")?,
        };
        let result = clipboard
            .set_text(text.to_owned())
            .context("Failed to write to clipboard");
        self.inner = Some(clipboard);
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    Copied,
    Failed,
}

impl CopyStatus {
    pub fn label(self) -> &'static str {
        match self {
            CopyStatus::Copied => "Copied!",
            CopyStatus::Failed => "Copy failed",
        }
    }
}

/// Last copy outcome and when it happened.
#[derive(Debug, Clone, Copy)]
pub struct CopyFeedback {
    status: CopyStatus,
    at: Instant,
}

impl CopyFeedback {
    pub fn new(status: CopyStatus, at: Instant) -> Self {
        Self { status, at }
    }

    /// The status while it is still fresh, `None` once it has expired.
    pub fn current(&self, now: Instant) -> Option<CopyStatus> {
        (now.saturating_duration_since(self.at) < COPY_STATUS_TTL).then_some(self.status)
    }
}

/// Copies `text`, logging failures, and returns the outcome to display.
pub fn copy_result(sink: &mut dyn ClipboardSink, text: &str) -> CopyStatus {
    match sink.set_text(text) {
        Ok(()) => CopyStatus::Copied,
        Err(e) => {
            warn!(error = ?e, "Copy to clipboard failed");
            CopyStatus::Failed
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Default)]
    pub struct FakeClipboard {
        pub contents: Option<String>,
        pub fail: bool,
    }

    impl ClipboardSink for FakeClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no display");
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn copy_reports_success() {
        let mut sink = FakeClipboard::default();
        let status = copy_result(&mut sink, "enhanced");
        assert_eq!(status, CopyStatus::Copied);
        assert_eq!(status.label(), "Copied!");
        assert_eq!(sink.contents.as_deref(), Some("enhanced"));
    }

    #[test]
    fn copy_reports_failure() {
        let mut sink = FakeClipboard {
            fail: true,
            ..Default::default()
        };
        let status = copy_result(&mut sink, "enhanced");
        assert_eq!(status, CopyStatus::Failed);
        assert_eq!(status.label(), "Copy failed");
    }

    #[test]
    fn feedback_expires_after_two_seconds() {
        let start = Instant::now();
        let feedback = CopyFeedback::new(CopyStatus::Copied, start);

        assert_eq!(feedback.current(start), Some(CopyStatus::Copied));
        assert_eq!(
            feedback.current(start + Duration::from_millis(1999)),
            Some(CopyStatus::Copied)
        );
        assert_eq!(feedback.current(start + COPY_STATUS_TTL), None);
    }
}
