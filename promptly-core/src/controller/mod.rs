mod state;

#[cfg(test)]
mod tests;

pub use state::{EnhanceError, Phase, PhaseKind, RequestId, RequestSnapshot, RequestState};

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::ai::{AiError, AiProvider, GenerationRequest, GenerationResponse, TokenUsage};
use crate::settings::config::DEFAULT_API_KEY_ENV;
use crate::templates::{EnhancementTemplate, TemplateRegistry};

const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// A validated submission waiting on the external call.
///
/// Produced by [`EnhancementController::begin_submit`]; the caller runs
/// [`PendingRequest::execute`] wherever it likes (inline or on a spawned
/// task) and feeds the resulting [`Completion`] back through
/// [`EnhancementController::complete`].
pub struct PendingRequest {
    pub id: RequestId,
    pub template_id: &'static str,
    pub prompt: String,
    provider: Arc<dyn AiProvider>,
}

impl PendingRequest {
    pub async fn execute(self) -> Completion {
        debug!(id = self.id, provider = self.provider.name(), "Executing enhancement request");
        let outcome = self
            .provider
            .generate(GenerationRequest::new(self.prompt))
            .await;
        Completion {
            id: self.id,
            outcome,
        }
    }
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("id", &self.id)
            .field("template_id", &self.template_id)
            .field("provider", &self.provider.name())
            .finish()
    }
}

#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub outcome: Result<GenerationResponse, AiError>,
}

/// Owns one session's [`RequestState`] and drives the request lifecycle.
///
/// `provider` is `None` when no credential was configured; that is only
/// reported once the user submits.
pub struct EnhancementController {
    registry: TemplateRegistry,
    provider: Option<Arc<dyn AiProvider>>,
    credential_env: String,
    state: RequestState,
    in_flight: Option<RequestId>,
    next_request_id: RequestId,
    last_usage: Option<TokenUsage>,
    updated_at: i64,
}

impl EnhancementController {
    pub fn new(registry: TemplateRegistry, provider: Option<Arc<dyn AiProvider>>) -> Self {
        let selected = registry.default_template().id;
        Self {
            registry,
            provider,
            credential_env: DEFAULT_API_KEY_ENV.to_string(),
            state: RequestState::new(selected),
            in_flight: None,
            next_request_id: 1,
            last_usage: None,
            updated_at: Utc::now().timestamp_millis(),
        }
    }

    /// Names the variable reported by `MissingCredential`.
    pub fn with_credential_env(mut self, name: impl Into<String>) -> Self {
        self.credential_env = name.into();
        self
    }

    pub fn credential_env(&self) -> &str {
        &self.credential_env
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn has_credential(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|p| p.name())
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Regenerate is only offered for non-empty input and when nothing is in
    /// flight.
    pub fn can_regenerate(&self) -> bool {
        !self.is_busy() && !self.state.raw_input.trim().is_empty()
    }

    pub fn selected_template(&self) -> &'static EnhancementTemplate {
        self.registry
            .get(self.state.selected_template_id)
            .unwrap_or_else(|_| self.registry.default_template())
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.raw_input = text.into();
        self.touch();
    }

    pub fn select_template(
        &mut self,
        id: &str,
    ) -> Result<&'static EnhancementTemplate, EnhanceError> {
        let template = self.registry.get(id)?;
        self.state.selected_template_id = template.id;
        self.touch();
        info!(template = template.id, "Enhancement mode selected");
        Ok(template)
    }

    /// Resets input and outcome to Idle. The selected template is kept, and a
    /// request already in flight still settles into the state when it
    /// completes.
    pub fn clear(&mut self) {
        self.state.raw_input.clear();
        self.state.phase = Phase::Idle;
        self.touch();
    }

    /// Validates preconditions and moves to Pending.
    ///
    /// Precondition failures settle the state as `Failed` immediately.
    /// `Busy` is returned without touching the state.
    pub fn begin_submit(&mut self) -> Result<PendingRequest, EnhanceError> {
        if let Some(id) = self.in_flight {
            warn!(in_flight = id, "Rejecting submit while a request is pending");
            return Err(EnhanceError::Busy);
        }

        let input = self.state.raw_input.trim();
        if input.is_empty() {
            return Err(self.fail(EnhanceError::EmptyInput));
        }

        let Some(provider) = self.provider.as_ref().map(Arc::clone) else {
            let err = EnhanceError::MissingCredential(self.credential_env.clone());
            return Err(self.fail(err));
        };

        let template = match self.registry.get(self.state.selected_template_id) {
            Ok(template) => template,
            Err(e) => return Err(self.fail(e.into())),
        };

        let prompt = template.render(input);
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(id);
        self.state.phase = Phase::Pending;
        self.touch();

        info!(id, template = template.id, "Enhancement request pending");

        Ok(PendingRequest {
            id,
            template_id: template.id,
            prompt,
            provider,
        })
    }

    /// Settles the in-flight request. Completions for any other id (for
    /// example one that was cancelled) are discarded and `None` is returned.
    pub fn complete(&mut self, completion: Completion) -> Option<Result<String, EnhanceError>> {
        if self.in_flight != Some(completion.id) {
            debug!(id = completion.id, "Discarding stale completion");
            return None;
        }
        self.in_flight = None;

        let result = match completion.outcome {
            Ok(response) => {
                info!(id = completion.id, "Enhancement succeeded");
                self.last_usage = Some(response.usage);
                self.state.phase = Phase::Succeeded(response.text.clone());
                Ok(response.text)
            }
            Err(e) => {
                warn!(id = completion.id, error = %e, "Enhancement failed");
                let err = EnhanceError::External(describe_failure(&e));
                self.state.phase = Phase::Failed(err.clone());
                Err(err)
            }
        };
        self.touch();
        Some(result)
    }

    /// Abandons the in-flight request. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        let Some(id) = self.in_flight.take() else {
            return false;
        };
        info!(id, "Enhancement request cancelled");
        if self.state.phase == Phase::Pending {
            self.state.phase = Phase::Failed(EnhanceError::Cancelled);
        }
        self.touch();
        true
    }

    /// Runs the whole protocol inline: validate, call the provider, settle.
    pub async fn submit(&mut self) -> Result<String, EnhanceError> {
        let pending = self.begin_submit()?;
        let completion = pending.execute().await;
        self.complete(completion)
            .unwrap_or(Err(EnhanceError::Cancelled))
    }

    pub fn snapshot(&self) -> RequestSnapshot {
        RequestSnapshot {
            raw_input: self.state.raw_input.clone(),
            selected_template_id: self.state.selected_template_id.to_string(),
            phase: self.state.phase_kind(),
            result_text: self.state.result_text().map(str::to_string),
            error: self.state.error().cloned(),
            error_message: self.state.error_message(),
            busy: self.is_busy(),
            last_usage: self.last_usage,
            updated_at: self.updated_at,
        }
    }

    fn fail(&mut self, err: EnhanceError) -> EnhanceError {
        info!(error = %err, "Enhancement rejected before dispatch");
        self.state.phase = Phase::Failed(err.clone());
        self.touch();
        err
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().timestamp_millis();
    }
}

fn describe_failure(err: &AiError) -> String {
    if err.message().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        err.to_string()
    }
}
