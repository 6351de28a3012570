use anyhow::Result;
use async_trait::async_trait;

use crate::types::GenerationRequest;

/// Remote capability that turns a request into an image reference.
///
/// One call is one provider round-trip: implementations never retry.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
