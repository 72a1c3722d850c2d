use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::ai::AiProvider;
use crate::controller::{Completion, EnhanceError, EnhancementController};
use crate::session::events::{EnhancerEvent, EventSender, TemplateInfo};
use crate::session::provider::create_active_provider;
use crate::settings::SettingsManager;
use crate::templates::TemplateRegistry;

/// Defines the possible input messages to the `EnhancerActor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnhancerActorMessage {
    SetInput(String),
    SelectTemplate(String),
    Clear,
    Submit,
    /// Submit again, but only when there is input and nothing in flight
    Regenerate,
    SetDarkMode(bool),
    /// Re-sends the current snapshot as `StateChanged`
    GetState,
}

/// The `EnhancerActor` owns one session's controller.
///
/// UIs send `EnhancerActorMessage`s through the input channel and render the
/// `EnhancerEvent`s coming back. The external call runs on its own local
/// task, so edits and mode changes are still processed while a request is
/// pending. A third channel carries cancellation.
pub struct EnhancerActor {
    pub tx: mpsc::UnboundedSender<EnhancerActorMessage>,
    pub cancel_tx: mpsc::UnboundedSender<()>,
}

impl EnhancerActor {
    pub fn builder() -> EnhancerActorBuilder {
        EnhancerActorBuilder::default()
    }

    pub fn set_input(&self, text: impl Into<String>) -> Result<()> {
        self.tx.send(EnhancerActorMessage::SetInput(text.into()))?;
        Ok(())
    }

    pub fn select_template(&self, id: impl Into<String>) -> Result<()> {
        self.tx.send(EnhancerActorMessage::SelectTemplate(id.into()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.tx.send(EnhancerActorMessage::Clear)?;
        Ok(())
    }

    pub fn submit(&self) -> Result<()> {
        self.tx.send(EnhancerActorMessage::Submit)?;
        Ok(())
    }

    pub fn regenerate(&self) -> Result<()> {
        self.tx.send(EnhancerActorMessage::Regenerate)?;
        Ok(())
    }

    pub fn set_dark_mode(&self, dark_mode: bool) -> Result<()> {
        self.tx.send(EnhancerActorMessage::SetDarkMode(dark_mode))?;
        Ok(())
    }

    pub fn get_state(&self) -> Result<()> {
        self.tx.send(EnhancerActorMessage::GetState)?;
        Ok(())
    }

    pub fn cancel(&self) -> Result<()> {
        self.cancel_tx.send(())?;
        Ok(())
    }
}

#[derive(Default)]
pub struct EnhancerActorBuilder {
    settings_path: Option<PathBuf>,
    provider: Option<Arc<dyn AiProvider>>,
    without_credential: bool,
}

impl EnhancerActorBuilder {
    pub fn settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    /// Overrides the provider built from settings
    pub fn provider(mut self, provider: Arc<dyn AiProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Launch as if no credential were configured
    pub fn without_credential(mut self) -> Self {
        self.without_credential = true;
        self
    }

    /// Launches the actor on the current `LocalSet` and returns its handle
    /// plus the event receiver.
    pub fn build(self) -> Result<(EnhancerActor, mpsc::UnboundedReceiver<EnhancerEvent>)> {
        let settings_manager = match self.settings_path {
            Some(path) => SettingsManager::from_path(path)?,
            None => SettingsManager::new()?,
        };
        let settings = settings_manager.settings();

        let provider = if self.without_credential {
            None
        } else if let Some(provider) = self.provider {
            Some(provider)
        } else {
            create_active_provider(&settings)?
        };

        let mut controller = EnhancementController::new(TemplateRegistry::default(), provider)
            .with_credential_env(settings.credential_env());
        if let Err(e) = controller.select_template(&settings.default_template) {
            warn!(error = %e, "Ignoring invalid default_template in settings");
        }

        Ok(launch(controller, settings_manager))
    }
}

struct ActorState {
    event_sender: EventSender,
    controller: EnhancementController,
    settings: SettingsManager,
    in_flight: Option<JoinHandle<()>>,
    completion_tx: mpsc::UnboundedSender<Completion>,
}

fn launch(
    controller: EnhancementController,
    settings: SettingsManager,
) -> (EnhancerActor, mpsc::UnboundedReceiver<EnhancerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (cancel_tx, cancel_rx) = mpsc::unbounded_channel();
    let (completion_tx, completion_rx) = mpsc::unbounded_channel();
    let (event_sender, event_rx) = EventSender::new();

    tokio::task::spawn_local(async move {
        event_sender.send(EnhancerEvent::SessionStarted {
            provider: controller.provider_name().map(str::to_string),
            credential_env: controller.credential_env().to_string(),
            dark_mode: settings.dark_mode(),
            templates: controller
                .registry()
                .list()
                .iter()
                .map(TemplateInfo::from)
                .collect(),
            snapshot: controller.snapshot(),
        });

        let state = ActorState {
            event_sender,
            controller,
            settings,
            in_flight: None,
            completion_tx,
        };

        run_actor(state, rx, cancel_rx, completion_rx).await;
    });

    (EnhancerActor { tx, cancel_tx }, event_rx)
}

async fn run_actor(
    mut state: ActorState,
    mut rx: mpsc::UnboundedReceiver<EnhancerActorMessage>,
    mut cancel_rx: mpsc::UnboundedReceiver<()>,
    mut completion_rx: mpsc::UnboundedReceiver<Completion>,
) {
    info!("EnhancerActor started");

    loop {
        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else {
                    info!("Request queue dropped, stopping actor");
                    break;
                };
                if let Err(e) = handle_message(&mut state, message) {
                    error!(?e, "Error processing message");
                    state.event_sender.error(format!("Error: {e:#}"));
                }
            }

            Some(_) = cancel_rx.recv() => {
                handle_cancelled(&mut state);
            }

            Some(completion) = completion_rx.recv() => {
                handle_completion(&mut state, completion);
            }
        }
    }

    if let Some(handle) = state.in_flight.take() {
        handle.abort();
    }
}

fn handle_message(state: &mut ActorState, message: EnhancerActorMessage) -> Result<()> {
    match message {
        EnhancerActorMessage::SetInput(text) => {
            let line_count = text.lines().count().max(1);
            state.controller.set_input(text);
            state
                .event_sender
                .send(EnhancerEvent::InputChanged { line_count });
            state.event_sender.state_changed(state.controller.snapshot());
        }
        EnhancerActorMessage::SelectTemplate(id) => match state.controller.select_template(&id) {
            Ok(_) => state.event_sender.state_changed(state.controller.snapshot()),
            Err(e) => state.event_sender.send(EnhancerEvent::Rejected(e)),
        },
        EnhancerActorMessage::Clear => {
            state.controller.clear();
            state
                .event_sender
                .send(EnhancerEvent::InputChanged { line_count: 1 });
            state.event_sender.state_changed(state.controller.snapshot());
        }
        EnhancerActorMessage::Submit => handle_submit(state),
        EnhancerActorMessage::Regenerate => {
            if state.controller.can_regenerate() {
                handle_submit(state);
            } else {
                info!("Ignoring regenerate without input or while busy");
            }
        }
        EnhancerActorMessage::SetDarkMode(dark_mode) => {
            state.settings.set_dark_mode(dark_mode)?;
            state
                .event_sender
                .send(EnhancerEvent::ThemeChanged { dark_mode });
        }
        EnhancerActorMessage::GetState => {
            state.event_sender.state_changed(state.controller.snapshot());
        }
    }
    Ok(())
}

fn handle_submit(state: &mut ActorState) {
    let pending = match state.controller.begin_submit() {
        Ok(pending) => pending,
        Err(EnhanceError::Busy) => {
            state
                .event_sender
                .send(EnhancerEvent::Rejected(EnhanceError::Busy));
            return;
        }
        Err(_) => {
            state.event_sender.state_changed(state.controller.snapshot());
            return;
        }
    };

    state.event_sender.state_changed(state.controller.snapshot());
    state.event_sender.set_busy(true);

    let completion_tx = state.completion_tx.clone();
    state.in_flight = Some(tokio::task::spawn_local(async move {
        let completion = pending.execute().await;
        let _ = completion_tx.send(completion);
    }));
}

fn handle_completion(state: &mut ActorState, completion: Completion) {
    if state.controller.complete(completion).is_none() {
        return;
    }
    state.in_flight = None;
    state.event_sender.state_changed(state.controller.snapshot());
    state.event_sender.set_busy(false);
}

fn handle_cancelled(state: &mut ActorState) {
    if let Some(handle) = state.in_flight.take() {
        handle.abort();
    }

    if !state.controller.cancel() {
        info!("Cancellation received while idle");
        return;
    }

    state.event_sender.send(EnhancerEvent::OperationCancelled {
        message: "Operation cancelled by user".to_string(),
    });
    state.event_sender.state_changed(state.controller.snapshot());
    state.event_sender.set_busy(false);
}
