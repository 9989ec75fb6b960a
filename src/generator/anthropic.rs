use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Generator;
use crate::config::GenerationConfig;

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: usize,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<Content>,
}

#[derive(Deserialize)]
struct Content {
    text: String,
}

pub struct AnthropicGenerator {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicGenerator {
    pub fn new(config: &GenerationConfig, api_key: String) -> Result<Self> {
        Ok(Self {
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            client: super::http_client(config)?,
        })
    }
}

#[async_trait]
impl Generator for AnthropicGenerator {
    async fn generate(&self, prompt: &str, max_length: usize) -> Result<String> {
        let instruction = format!(
            r#"Continue the following text in the same voice. Keep the answer short.

Important:
- Return ONLY the continuation, no preamble
- Do not repeat the text you were given

Text:
{prompt}"#
        );

        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: max_length,
            messages: vec![Message {
                role: "user".to_string(),
                content: instruction,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?
            .error_for_status()
            .context("Anthropic API error")?;

        let api_response: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        let continuation = &api_response
            .content
            .first()
            .context("No content in Anthropic response")?
            .text;

        Ok(with_prompt(prompt, continuation))
    }
}

/// The model only returns the continuation; glue the prompt back on so the
/// output reads like a full-text generation.
fn with_prompt(prompt: &str, continuation: &str) -> String {
    format!("{prompt}{}", continuation.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_follows_the_prompt() {
        assert_eq!(
            with_prompt("Question: Q\nResponse: Yes\n", "  and then some."),
            "Question: Q\nResponse: Yes\nand then some."
        );
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let generator =
            AnthropicGenerator::new(&GenerationConfig::default(), "key".to_string()).unwrap();
        assert_eq!(generator.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(generator.model, DEFAULT_MODEL);
    }
}
