use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::TokenUsage;
use crate::templates::TemplateError;

pub type RequestId = u64;

/// Why a submission did not produce a result.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum EnhanceError {
    #[error("Please enter a prompt to enhance")]
    EmptyInput,

    /// Carries the environment variable the active provider reads its key from
    #[error("API key not configured. Please set {0} in your environment.")]
    MissingCredential(String),

    #[error("Unknown enhancement mode '{0}'")]
    NotFound(String),

    #[error("An enhancement is already in progress")]
    Busy,

    #[error("Enhancement cancelled")]
    Cancelled,

    #[error("Enhancement failed: {0}")]
    External(String),
}

impl From<TemplateError> for EnhanceError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(id) => Self::NotFound(id),
        }
    }
}

/// Lifecycle of the current request. Payloads live on the variant so a
/// settled phase always carries exactly one of result or error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Succeeded(String),
    Failed(EnhanceError),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PhaseKind {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Pending => PhaseKind::Pending,
            Phase::Succeeded(_) => PhaseKind::Succeeded,
            Phase::Failed(_) => PhaseKind::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState {
    pub raw_input: String,
    pub selected_template_id: &'static str,
    pub phase: Phase,
}

impl RequestState {
    pub fn new(selected_template_id: &'static str) -> Self {
        Self {
            raw_input: String::new(),
            selected_template_id,
            phase: Phase::Idle,
        }
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn result_text(&self) -> Option<&str> {
        match &self.phase {
            Phase::Succeeded(text) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&EnhanceError> {
        match &self.phase {
            Phase::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(|e| e.to_string())
    }
}

/// Owned, serialisable view of the controller handed to UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    pub raw_input: String,
    pub selected_template_id: String,
    pub phase: PhaseKind,
    pub result_text: Option<String>,
    pub error: Option<EnhanceError>,
    pub error_message: Option<String>,
    pub busy: bool,
    pub last_usage: Option<TokenUsage>,
    pub updated_at: i64,
}

impl RequestSnapshot {
    pub fn can_regenerate(&self) -> bool {
        !self.busy && !self.raw_input.trim().is_empty()
    }
}
