use anyhow::Result;
use async_trait::async_trait;

use super::Generator;

/// Offline stand-in for a model: hands the prompt back untouched, so the
/// reply is the selected canned response itself.
pub struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str, _max_length: usize) -> Result<String> {
        Ok(prompt.to_owned())
    }
}
