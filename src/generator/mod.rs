pub(crate) mod anthropic;
pub(crate) mod huggingface;
pub(crate) mod naive;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use strum::{Display, EnumString};

use crate::config::{Environment, GenerationConfig};

/// Turns a prompt into generated text. The returned text is expected to
/// contain the prompt followed by the continuation.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, max_length: usize) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Naive,
    Huggingface,
    Anthropic,
}

pub fn build(config: &GenerationConfig, environment: &Environment) -> Result<Box<dyn Generator>> {
    Ok(match config.backend {
        Backend::Naive => Box::new(naive::EchoGenerator),
        Backend::Huggingface => {
            let api_token = environment
                .huggingface_api_token
                .clone()
                .context("HUGGINGFACE_API_TOKEN environment variable not set")?;
            Box::new(huggingface::HuggingFaceGenerator::new(config, api_token)?)
        }
        Backend::Anthropic => {
            let api_key = environment
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY environment variable not set")?;
            Box::new(anthropic::AnthropicGenerator::new(config, api_key)?)
        }
    })
}

fn http_client(config: &GenerationConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}
