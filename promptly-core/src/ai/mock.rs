use crate::ai::{error::AiError, provider::AiProvider, types::*};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock behavior for the mock provider
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MockBehavior {
    /// Return a fixed successful response
    #[default]
    Success,
    /// Return the given text
    Reply { text: String },
    /// Fail with a network error carrying the given message
    NetworkError { message: String },
    /// Fail with a terminal error carrying the given message (may be empty)
    Fail { message: String },
    /// Sleep before applying the inner behavior. Used to hold a request in
    /// the pending phase.
    Delay { millis: u64, then: Box<MockBehavior> },
    /// Pops one behavior per call; falls back to `Success` once drained
    Queue { behaviors: Vec<MockBehavior> },
}

pub const MOCK_RESPONSE: &str = "Mock response";

/// Mock AI provider for testing
#[derive(Clone, Default)]
pub struct MockProvider {
    behavior: Arc<Mutex<MockBehavior>>,
    call_count: Arc<Mutex<usize>>,
    captured_prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            call_count: Arc::new(Mutex::new(0)),
            captured_prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply { text: text.into() })
    }

    fn pop_behavior_from_queue(behavior: &mut MockBehavior) -> MockBehavior {
        if let MockBehavior::Queue { behaviors } = behavior {
            if behaviors.is_empty() {
                return MockBehavior::Success;
            }
            return behaviors.remove(0);
        }
        behavior.clone()
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_captured_prompts(&self) -> Vec<String> {
        self.captured_prompts.lock().unwrap().clone()
    }

    pub fn get_last_captured_prompt(&self) -> Option<String> {
        self.captured_prompts.lock().unwrap().last().cloned()
    }

    async fn apply(behavior: MockBehavior) -> Result<GenerationResponse, AiError> {
        let mut behavior = behavior;
        loop {
            match behavior {
                MockBehavior::Success => {
                    return Ok(GenerationResponse {
                        text: MOCK_RESPONSE.to_string(),
                        usage: TokenUsage::new(10, 10),
                    })
                }
                MockBehavior::Reply { text } => {
                    return Ok(GenerationResponse {
                        text,
                        usage: TokenUsage::new(10, 10),
                    })
                }
                MockBehavior::NetworkError { message } => {
                    return Err(AiError::Network(anyhow::anyhow!(message)))
                }
                MockBehavior::Fail { message } => {
                    return Err(AiError::Terminal(anyhow::anyhow!(message)))
                }
                MockBehavior::Delay { millis, then } => {
                    tokio::time::sleep(Duration::from_millis(millis)).await;
                    behavior = *then;
                }
                MockBehavior::Queue { .. } => return Ok(GenerationResponse::text_only(MOCK_RESPONSE)),
            }
        }
    }
}

#[async_trait::async_trait]
impl AiProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, AiError> {
        self.captured_prompts
            .lock()
            .unwrap()
            .push(request.prompt.clone());

        *self.call_count.lock().unwrap() += 1;

        let effective = {
            let mut behavior = self.behavior.lock().unwrap();
            Self::pop_behavior_from_queue(&mut behavior)
        };

        Self::apply(effective).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queue_pops_in_order_then_falls_back_to_success() {
        let provider = MockProvider::new(MockBehavior::Queue {
            behaviors: vec![
                MockBehavior::Reply {
                    text: "first".to_string(),
                },
                MockBehavior::NetworkError {
                    message: "timeout".to_string(),
                },
            ],
        });

        let first = provider.generate(GenerationRequest::new("a")).await.unwrap();
        assert_eq!(first.text, "first");

        let second = provider.generate(GenerationRequest::new("b")).await;
        assert!(matches!(second, Err(AiError::Network(_))));

        let third = provider.generate(GenerationRequest::new("c")).await.unwrap();
        assert_eq!(third.text, MOCK_RESPONSE);

        assert_eq!(provider.get_call_count(), 3);
        assert_eq!(provider.get_captured_prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn clones_share_counters() {
        let provider = MockProvider::replying("ok");
        let clone = provider.clone();

        clone.generate(GenerationRequest::new("x")).await.unwrap();

        assert_eq!(provider.get_call_count(), 1);
        assert_eq!(provider.get_last_captured_prompt().as_deref(), Some("x"));
    }
}
