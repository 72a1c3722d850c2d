use anyhow::{bail, Context, Result};
use crossterm::{
    event::{Event as CrosstermEvent, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use promptly_core::session::{EnhancerActor, EnhancerEvent};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use super::dispatch::Dispatcher;
use super::event_handler::handle_enhancer_event;
use super::input_handler::{configure_textarea, handle_key_event, TuiAction};
use super::state::TuiState;
use super::ui::draw_ui;

use crate::clipboard::SystemClipboard;

pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    dispatcher: Dispatcher,
    event_rx: mpsc::UnboundedReceiver<EnhancerEvent>,
    state: TuiState,
    initial_template: Option<String>,
}

impl TuiApp {
    pub fn new(settings_path: Option<PathBuf>, template: Option<String>) -> Result<Self> {
        let mut builder = EnhancerActor::builder();
        if let Some(path) = settings_path {
            builder = builder.settings_path(path);
        }
        let (actor, event_rx) = builder.build()?;

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            dispatcher: Dispatcher::new(actor, Box::new(SystemClipboard::default())),
            event_rx,
            state: TuiState::new(),
            initial_template: template,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Install panic hook to restore terminal on panic
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        self.wait_for_start().await?;

        let mut textarea = TextArea::default();
        configure_textarea(&mut textarea, self.state.palette());

        if let Some(template) = self.initial_template.take() {
            self.dispatcher.dispatch(
                TuiAction::SelectTemplate(template),
                &mut self.state,
                &mut textarea,
            )?;
        }

        let tick_rate = Duration::from_millis(50);
        let mut crossterm_reader = EventStream::new();

        loop {
            let state = &mut self.state;
            let ta = &textarea;
            self.terminal.draw(|frame| {
                draw_ui(frame, state, ta);
            })?;

            if self.state.should_quit {
                break;
            }

            tokio::select! {
                Some(event) = self.event_rx.recv() => {
                    let was_dark = self.state.dark_mode;
                    handle_enhancer_event(&mut self.state, event);
                    if was_dark != self.state.dark_mode {
                        configure_textarea(&mut textarea, self.state.palette());
                    }
                }

                Some(Ok(crossterm_event)) = crossterm_reader.next() => {
                    if let CrosstermEvent::Key(key) = crossterm_event {
                        let action = handle_key_event(key, &mut textarea, &mut self.state);
                        self.dispatcher.dispatch(action, &mut self.state, &mut textarea)?;
                    }
                }

                // Tick for spinner animation and expiring copy status
                _ = tokio::time::sleep(tick_rate) => {
                    if self.state.busy {
                        self.state.spinner_frame += 1;
                    }
                    self.state.expire_feedback(Instant::now());
                }
            }
        }

        self.restore_terminal()?;
        Ok(())
    }

    async fn wait_for_start(&mut self) -> Result<()> {
        while let Some(event) = self.event_rx.recv().await {
            let started = matches!(event, EnhancerEvent::SessionStarted { .. });
            handle_enhancer_event(&mut self.state, event);
            if started {
                return Ok(());
            }
        }
        bail!("Enhancer stopped before starting")
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
