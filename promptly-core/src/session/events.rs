use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::controller::{EnhanceError, RequestSnapshot};
use crate::templates::EnhancementTemplate;

/// `EnhancerEvent` are the messages sent from the actor - the output of the
/// actor. UIs render these and never touch the controller directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum EnhancerEvent {
    /// Emitted once after launch
    SessionStarted {
        provider: Option<String>,
        /// Environment variable the active provider reads its key from
        credential_env: String,
        dark_mode: bool,
        templates: Vec<TemplateInfo>,
        snapshot: RequestSnapshot,
    },
    StateChanged(RequestSnapshot),
    /// The raw input changed; lets layouts resize the input area
    InputChanged {
        line_count: usize,
    },
    /// The theme preference was written to the preference store
    ThemeChanged {
        dark_mode: bool,
    },
    /// Brackets each external call
    BusyStatusChanged(bool),
    OperationCancelled {
        message: String,
    },
    /// A request that left the state untouched (unknown mode, busy)
    Rejected(EnhanceError),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&EnhancementTemplate> for TemplateInfo {
    fn from(template: &EnhancementTemplate) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name.to_string(),
            description: template.description.to_string(),
        }
    }
}

/// A small wrapper over the `event_tx` for convienance.
#[derive(Clone)]
pub struct EventSender {
    event_tx: mpsc::UnboundedSender<EnhancerEvent>,
}

impl EventSender {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EnhancerEvent>) {
        let (event_tx, rx) = mpsc::unbounded_channel();
        (Self { event_tx }, rx)
    }

    pub fn send(&self, event: EnhancerEvent) {
        let _ = self.event_tx.send(event);
    }

    pub fn state_changed(&self, snapshot: RequestSnapshot) {
        self.send(EnhancerEvent::StateChanged(snapshot));
    }

    pub fn set_busy(&self, busy: bool) {
        self.send(EnhancerEvent::BusyStatusChanged(busy));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(EnhancerEvent::Error(message.into()));
    }
}
