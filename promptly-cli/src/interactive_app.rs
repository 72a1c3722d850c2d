use anyhow::{bail, Result};
use promptly_core::controller::{PhaseKind, RequestSnapshot};
use promptly_core::session::{EnhancerActor, EnhancerEvent, TemplateInfo};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::banner::{format_template_list, print_startup_banner, BannerInfo};
use crate::clipboard::{copy_result, SystemClipboard};
use crate::commands::{handle_local_command, LocalCommand, LocalCommandResult, HELP_TEXT};

pub struct InteractiveApp {
    actor: EnhancerActor,
    event_rx: mpsc::UnboundedReceiver<EnhancerEvent>,
    initial_template: Option<String>,
    templates: Vec<TemplateInfo>,
    snapshot: Option<RequestSnapshot>,
    provider: Option<String>,
    credential_env: String,
    dark_mode: bool,
    show_comparison: bool,
    clipboard: SystemClipboard,
}

impl InteractiveApp {
    pub fn new(settings_path: Option<PathBuf>, template: Option<String>) -> Result<Self> {
        let mut builder = EnhancerActor::builder();
        if let Some(path) = settings_path {
            builder = builder.settings_path(path);
        }
        let (actor, event_rx) = builder.build()?;

        Ok(Self {
            actor,
            event_rx,
            initial_template: template,
            templates: Vec::new(),
            snapshot: None,
            provider: None,
            credential_env: String::new(),
            dark_mode: true,
            show_comparison: false,
            clipboard: SystemClipboard::default(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        self.wait_for_start().await?;
        print_startup_banner(&BannerInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            provider: self.provider.clone(),
            credential_env: self.credential_env.clone(),
            mode: self.selected_name(),
            dark_mode: self.dark_mode,
        });

        if let Some(template) = self.initial_template.take() {
            self.select_mode(template).await?;
        }

        loop {
            let prompt = format!("\x1b[35m{}>\x1b[0m ", self.selected_id());
            let line = match rl.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(_) => break,
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            rl.add_history_entry(&line)?;

            match handle_local_command(input) {
                LocalCommandResult::Command(command) => self.run_command(command).await?,
                LocalCommandResult::Invalid { msg } => print_error(&msg),
                LocalCommandResult::Exit => break,
                LocalCommandResult::Prompt(prompt) => self.enhance(prompt).await?,
                LocalCommandResult::Unhandled => self.enhance(input.to_string()).await?,
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    async fn run_command(&mut self, command: LocalCommand) -> Result<()> {
        match command {
            LocalCommand::ListModes => {
                println!("{}", format_template_list(&self.templates, self.selected_id()));
            }
            LocalCommand::SelectMode(id) => self.select_mode(id).await?,
            LocalCommand::Clear => {
                self.actor.clear()?;
                self.wait_for_state().await?;
                print_system("Cleared");
            }
            LocalCommand::Regenerate => {
                let can_regenerate = self
                    .snapshot
                    .as_ref()
                    .is_some_and(RequestSnapshot::can_regenerate);
                if !can_regenerate {
                    print_system("Nothing to regenerate yet");
                    return Ok(());
                }
                self.actor.regenerate()?;
                self.wait_for_response().await?;
            }
            LocalCommand::Copy => {
                let Some(text) = self.snapshot.as_ref().and_then(|s| s.result_text.clone()) else {
                    print_system("Nothing to copy yet");
                    return Ok(());
                };
                print_system(copy_result(&mut self.clipboard, &text).label());
            }
            LocalCommand::ToggleComparison => {
                self.show_comparison = !self.show_comparison;
                print_system(if self.show_comparison {
                    "Comparison: on"
                } else {
                    "Comparison: off"
                });
                if let Some(snapshot) = self.snapshot.clone() {
                    if snapshot.phase == PhaseKind::Succeeded {
                        self.print_outcome(&snapshot);
                    }
                }
            }
            LocalCommand::ToggleTheme => {
                self.actor.set_dark_mode(!self.dark_mode)?;
                self.wait_for(|e| matches!(e, EnhancerEvent::ThemeChanged { .. }))
                    .await?;
                print_system(if self.dark_mode {
                    "Theme: dark"
                } else {
                    "Theme: light"
                });
            }
            LocalCommand::Help => println!("{HELP_TEXT}"),
        }
        Ok(())
    }

    async fn select_mode(&mut self, id: String) -> Result<()> {
        self.actor.select_template(id)?;
        self.wait_for(|e| {
            matches!(
                e,
                EnhancerEvent::StateChanged(_) | EnhancerEvent::Rejected(_)
            )
        })
        .await?;
        print_system(&format!("Mode: {}", self.selected_name()));
        Ok(())
    }

    async fn enhance(&mut self, input: String) -> Result<()> {
        self.actor.set_input(input)?;
        self.wait_for_state().await?;
        self.actor.submit()?;
        self.wait_for_response().await
    }

    /// Waits until the submission settles. A submission that fails its
    /// preconditions settles without ever going busy.
    async fn wait_for_response(&mut self) -> Result<()> {
        use tokio::signal;

        let mut dispatched = false;
        loop {
            tokio::select! {
                recv = self.event_rx.recv() => {
                    let Some(event) = recv else {
                        bail!("Enhancer stopped unexpectedly");
                    };
                    let settled = match &event {
                        EnhancerEvent::BusyStatusChanged(true) => {
                            dispatched = true;
                            false
                        }
                        EnhancerEvent::BusyStatusChanged(false) => true,
                        EnhancerEvent::StateChanged(s) => !dispatched && !s.busy,
                        EnhancerEvent::Rejected(_) => true,
                        _ => false,
                    };
                    self.apply_event(event);
                    if settled {
                        break;
                    }
                }
                _ = signal::ctrl_c() => {
                    self.actor.cancel()?;
                }
            }
        }

        if let Some(snapshot) = self.snapshot.clone() {
            self.print_outcome(&snapshot);
        }
        Ok(())
    }

    async fn wait_for_start(&mut self) -> Result<()> {
        self.wait_for(|e| matches!(e, EnhancerEvent::SessionStarted { .. }))
            .await
    }

    async fn wait_for_state(&mut self) -> Result<()> {
        self.wait_for(|e| matches!(e, EnhancerEvent::StateChanged(_)))
            .await
    }

    async fn wait_for<F>(&mut self, done: F) -> Result<()>
    where
        F: Fn(&EnhancerEvent) -> bool,
    {
        while let Some(event) = self.event_rx.recv().await {
            let finished = done(&event);
            self.apply_event(event);
            if finished {
                return Ok(());
            }
        }
        bail!("Enhancer stopped unexpectedly")
    }

    fn apply_event(&mut self, event: EnhancerEvent) {
        match event {
            EnhancerEvent::SessionStarted {
                provider,
                credential_env,
                dark_mode,
                templates,
                snapshot,
            } => {
                self.provider = provider;
                self.credential_env = credential_env;
                self.dark_mode = dark_mode;
                self.templates = templates;
                self.snapshot = Some(snapshot);
            }
            EnhancerEvent::StateChanged(snapshot) => self.snapshot = Some(snapshot),
            EnhancerEvent::ThemeChanged { dark_mode } => self.dark_mode = dark_mode,
            EnhancerEvent::BusyStatusChanged(true) => {
                print_system(&format!("Enhancing with {}...", self.selected_name()));
            }
            EnhancerEvent::OperationCancelled { message } => print_system(&message),
            EnhancerEvent::Rejected(e) => print_error(&e.to_string()),
            EnhancerEvent::Error(e) => print_error(&e),
            EnhancerEvent::InputChanged { .. } | EnhancerEvent::BusyStatusChanged(false) => {}
        }
    }

    fn print_outcome(&self, snapshot: &RequestSnapshot) {
        match (&snapshot.result_text, &snapshot.error_message) {
            (Some(text), _) if self.show_comparison => {
                println!("\x1b[90m── Original ──\x1b[0m");
                println!("{}", snapshot.raw_input);
                println!("\x1b[32m── Enhanced ──\x1b[0m");
                println!("{text}");
            }
            (Some(text), _) => {
                println!("\x1b[32m── Enhanced ({}) ──\x1b[0m", self.selected_name());
                println!("{text}");
            }
            (None, Some(message)) => print_error(message),
            (None, None) => {}
        }
    }

    fn selected_id(&self) -> &str {
        self.snapshot
            .as_ref()
            .map(|s| s.selected_template_id.as_str())
            .unwrap_or_default()
    }

    fn selected_name(&self) -> String {
        let id = self.selected_id();
        self.templates
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

fn print_system(msg: &str) {
    println!("\x1b[90m{msg}\x1b[0m");
}

fn print_error(msg: &str) {
    eprintln!("\x1b[31m{msg}\x1b[0m");
}
