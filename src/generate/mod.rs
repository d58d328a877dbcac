//! Generation backend: turns prompts into text.

use async_trait::async_trait;

use crate::error::Result;

mod openai;
pub use openai::OpenAiGenerator;

/// A text generation backend.
///
/// `system` is the instruction; each entry of `texts` becomes one user
/// message, in order. Implementations return the backend's first
/// candidate and report an empty candidate as
/// [`crate::MuninError::EmptyGeneration`].
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, system: &str, texts: &[String]) -> Result<String>;
}
