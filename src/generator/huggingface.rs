use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Generator;
use crate::config::GenerationConfig;

const DEFAULT_MODEL: &str = "EleutherAI/gpt-neo-1.3B";
const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
    options: Options,
}

#[derive(Serialize)]
struct Parameters {
    max_new_tokens: usize,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Serialize)]
struct Options {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

pub struct HuggingFaceGenerator {
    url: String,
    api_token: String,
    client: reqwest::Client,
}

impl HuggingFaceGenerator {
    pub fn new(config: &GenerationConfig, api_token: String) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);

        Ok(Self {
            url: format!("{}/{model}", endpoint.trim_end_matches('/')),
            api_token,
            client: super::http_client(config)?,
        })
    }
}

#[async_trait]
impl Generator for HuggingFaceGenerator {
    async fn generate(&self, prompt: &str, max_length: usize) -> Result<String> {
        let request = InferenceRequest {
            inputs: prompt,
            parameters: Parameters {
                max_new_tokens: max_length,
                do_sample: true,
                return_full_text: true,
            },
            options: Options {
                wait_for_model: true,
            },
        };

        let generations: Vec<Generation> = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Hugging Face inference API")?
            .error_for_status()
            .context("Hugging Face inference API error")?
            .json()
            .await
            .context("Failed to parse Hugging Face inference response")?;

        first_generation(generations)
    }
}

fn first_generation(generations: Vec<Generation>) -> Result<String> {
    generations
        .into_iter()
        .next()
        .map(|generation| generation.generated_text)
        .context("No generations in Hugging Face response")
}
