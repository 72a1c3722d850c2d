use crate::ai::{error::AiError, types::*};

/// The boundary to a generative-language service: one prompt in, generated
/// text out.
#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, request: GenerationRequest)
        -> Result<GenerationResponse, AiError>;
}
