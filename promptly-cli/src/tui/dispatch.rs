use anyhow::Result;
use promptly_core::session::EnhancerActor;
use std::time::Instant;
use tracing::info;
use tui_textarea::TextArea;

use super::input_handler::{reset_textarea, restore_textarea, TuiAction};
use super::state::TuiState;
use crate::clipboard::{copy_result, ClipboardSink};
use crate::commands::{handle_local_command, LocalCommand, LocalCommandResult};

/// Turns `TuiAction`s into actor messages and local view changes.
pub struct Dispatcher {
    actor: EnhancerActor,
    clipboard: Box<dyn ClipboardSink>,
}

impl Dispatcher {
    pub fn new(actor: EnhancerActor, clipboard: Box<dyn ClipboardSink>) -> Self {
        Self { actor, clipboard }
    }

    pub fn dispatch(
        &mut self,
        action: TuiAction,
        state: &mut TuiState,
        textarea: &mut TextArea,
    ) -> Result<()> {
        match action {
            TuiAction::Submit(text) => self.submit(text, state)?,
            TuiAction::Command(text) => self.run_command(&text, state, textarea)?,
            TuiAction::Regenerate => self.actor.regenerate()?,
            TuiAction::SelectTemplate(id) => self.actor.select_template(id)?,
            TuiAction::Clear => {
                state.notice = None;
                self.actor.clear()?;
            }
            TuiAction::Copy => self.copy(state),
            TuiAction::ToggleTheme => self.actor.set_dark_mode(!state.dark_mode)?,
            TuiAction::Cancel => self.actor.cancel()?,
            TuiAction::Quit => state.should_quit = true,
            TuiAction::None => {}
        }
        Ok(())
    }

    fn submit(&self, text: String, state: &mut TuiState) -> Result<()> {
        state.notice = None;
        self.actor.set_input(text)?;
        self.actor.submit()
    }

    fn run_command(&mut self, text: &str, state: &mut TuiState, textarea: &mut TextArea) -> Result<()> {
        let command = match handle_local_command(text) {
            LocalCommandResult::Command(command) => command,
            LocalCommandResult::Prompt(prompt) => {
                restore_textarea(textarea, &prompt, state.palette());
                return self.submit(prompt, state);
            }
            LocalCommandResult::Invalid { msg } => {
                state.set_notice(msg, true);
                return Ok(());
            }
            LocalCommandResult::Exit => {
                state.should_quit = true;
                return Ok(());
            }
            LocalCommandResult::Unhandled => return Ok(()),
        };

        info!(?command, "Running command");
        match command {
            LocalCommand::ListModes => {
                let ids: Vec<&str> = state.templates.iter().map(|t| t.id.as_str()).collect();
                state.set_notice(format!("Modes: {}", ids.join(", ")), false);
            }
            LocalCommand::SelectMode(id) => self.actor.select_template(id)?,
            LocalCommand::Clear => {
                reset_textarea(textarea, state.palette());
                state.input_lines = 1;
                self.actor.clear()?;
            }
            LocalCommand::Regenerate => {
                if state.can_regenerate() {
                    self.actor.regenerate()?;
                } else {
                    state.set_notice("Nothing to regenerate yet", false);
                }
            }
            LocalCommand::Copy => self.copy(state),
            LocalCommand::ToggleComparison => {
                state.show_comparison = !state.show_comparison;
            }
            LocalCommand::ToggleTheme => self.actor.set_dark_mode(!state.dark_mode)?,
            LocalCommand::Help => state.show_help = true,
        }
        Ok(())
    }

    fn copy(&mut self, state: &mut TuiState) {
        let Some(text) = state.result_text().map(str::to_string) else {
            state.set_notice("Nothing to copy yet", false);
            return;
        };
        let status = copy_result(self.clipboard.as_mut(), &text);
        state.record_copy(status, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::CopyStatus;
    use crate::tui::event_handler::handle_enhancer_event;
    use crate::tui::input_handler::handle_key_event;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use promptly_core::ai::mock::{MockBehavior, MockProvider};
    use promptly_core::session::EnhancerEvent;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    #[derive(Clone, Default)]
    struct RecordingClipboard {
        copied: Arc<Mutex<Vec<String>>>,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// A TUI session without a terminal: keys go through the real key
    /// handler and dispatcher, events come back from a live actor.
    struct Session {
        dispatcher: Dispatcher,
        event_rx: mpsc::UnboundedReceiver<EnhancerEvent>,
        state: TuiState,
        textarea: TextArea<'static>,
        mock: MockProvider,
        clipboard: RecordingClipboard,
        _settings_dir: TempDir,
    }

    impl Session {
        async fn start(replies: &[&str]) -> Self {
            let settings_dir = TempDir::new().unwrap();
            let mock = MockProvider::new(MockBehavior::Queue {
                behaviors: replies
                    .iter()
                    .map(|text| MockBehavior::Reply {
                        text: text.to_string(),
                    })
                    .collect(),
            });
            let (actor, event_rx) = EnhancerActor::builder()
                .settings_path(settings_dir.path().join("settings.toml"))
                .provider(Arc::new(mock.clone()))
                .build()
                .unwrap();
            let clipboard = RecordingClipboard::default();

            let mut session = Session {
                dispatcher: Dispatcher::new(actor, Box::new(clipboard.clone())),
                event_rx,
                state: TuiState::new(),
                textarea: TextArea::default(),
                mock,
                clipboard,
                _settings_dir: settings_dir,
            };
            session
                .settle_on(|e| matches!(e, EnhancerEvent::SessionStarted { .. }))
                .await;
            session
        }

        fn press(&mut self, code: KeyCode, modifiers: KeyModifiers) {
            let action = handle_key_event(
                KeyEvent::new(code, modifiers),
                &mut self.textarea,
                &mut self.state,
            );
            self.dispatcher
                .dispatch(action, &mut self.state, &mut self.textarea)
                .unwrap();
        }

        fn type_text(&mut self, text: &str) {
            for c in text.chars() {
                self.press(KeyCode::Char(c), KeyModifiers::NONE);
            }
        }

        fn erase_input(&mut self) {
            let len = self.textarea.lines().join("\n").chars().count();
            for _ in 0..len {
                self.press(KeyCode::Backspace, KeyModifiers::NONE);
            }
            assert_eq!(self.textarea.lines(), [""]);
        }

        async fn settle_on<F>(&mut self, done: F)
        where
            F: Fn(&EnhancerEvent) -> bool,
        {
            while let Some(event) = self.event_rx.recv().await {
                let finished = done(&event);
                handle_enhancer_event(&mut self.state, event);
                if finished {
                    return;
                }
            }
            panic!("Enhancer stopped unexpectedly");
        }

        async fn settle_request(&mut self) {
            self.settle_on(|e| matches!(e, EnhancerEvent::BusyStatusChanged(false)))
                .await;
        }

        async fn enhance(&mut self, text: &str) {
            self.type_text(text);
            self.press(KeyCode::Enter, KeyModifiers::NONE);
            self.settle_request().await;
        }
    }

    fn run_local<F, Fut>(test_fn: F)
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        use tokio::time::{timeout, Duration};

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime");
        let local = tokio::task::LocalSet::new();

        runtime.block_on(local.run_until(async {
            timeout(Duration::from_secs(30), test_fn())
                .await
                .expect("Test timed out after 30 seconds");
        }));
    }

    #[test]
    fn enter_sends_the_typed_prompt() {
        run_local(|| async {
            let mut session = Session::start(&["Explain recursion precisely."]).await;

            session.enhance("explain recursion").await;

            assert_eq!(session.state.result_text(), Some("Explain recursion precisely."));
            assert_eq!(session.state.raw_input(), "explain recursion");
            assert_eq!(session.mock.get_call_count(), 1);
        });
    }

    #[test]
    fn typed_regen_command_resubmits_the_last_prompt() {
        run_local(|| async {
            let mut session = Session::start(&["first", "second"]).await;
            session.enhance("explain recursion").await;

            session.erase_input();
            session.type_text("/regen");
            session.press(KeyCode::Enter, KeyModifiers::NONE);
            session.settle_request().await;

            assert_eq!(session.mock.get_call_count(), 2);
            assert_eq!(session.state.result_text(), Some("second"));
            let prompts = session.mock.get_captured_prompts();
            assert!(prompts.iter().all(|p| p.contains("explain recursion")));
            assert_eq!(session.textarea.lines(), ["explain recursion"]);
        });
    }

    #[test]
    fn compare_command_keeps_the_original_prompt() {
        run_local(|| async {
            let mut session = Session::start(&["better", "better again"]).await;
            session.enhance("make it better").await;

            session.erase_input();
            session.type_text("/compare");
            session.press(KeyCode::Enter, KeyModifiers::NONE);
            assert!(session.state.show_comparison);

            // The actor still holds the prompt, so regenerate goes through
            session.press(KeyCode::Char('r'), KeyModifiers::CONTROL);
            session.settle_request().await;

            assert_eq!(session.mock.get_call_count(), 2);
            assert_eq!(session.state.raw_input(), "make it better");
            assert_eq!(session.state.result_text(), Some("better again"));
        });
    }

    #[test]
    fn escaped_slash_is_enhanced_as_a_prompt() {
        run_local(|| async {
            let mut session = Session::start(&["done"]).await;

            session.enhance("//etc/hosts explained").await;

            let prompt = session.mock.get_last_captured_prompt().unwrap();
            assert!(prompt.contains("/etc/hosts explained"));
            assert!(!prompt.contains("//etc"));
            assert_eq!(session.state.raw_input(), "/etc/hosts explained");
        });
    }

    #[test]
    fn copy_command_writes_the_result() {
        run_local(|| async {
            let mut session = Session::start(&["copied text"]).await;
            session.enhance("copy me").await;

            session.erase_input();
            session.type_text("/copy");
            session.press(KeyCode::Enter, KeyModifiers::NONE);

            assert_eq!(*session.clipboard.copied.lock().unwrap(), ["copied text"]);
            assert_eq!(
                session.state.copy_status(Instant::now()),
                Some(CopyStatus::Copied)
            );
        });
    }
}
