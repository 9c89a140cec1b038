use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::error::GenerationError;
use crate::models::GenerationContext;
use crate::services::templates;

/// Free-text generation behind a swappable seam.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, context: &GenerationContext) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Ollama `/api/generate` client. Generates in English and, when enabled,
/// translates the answer to Turkish with a second call.
#[derive(Debug)]
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
    translate: bool,
}

impl OllamaGenerator {
    pub fn new(
        base_url: &str,
        model: &str,
        timeout: Duration,
        translate: bool,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            translate,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        if !config.is_generation_configured() {
            return Err(GenerationError::NotConfigured);
        }
        Self::new(
            &config.ollama_url,
            &config.ollama_model,
            config.generation_timeout,
            config.translate_replies,
        )
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generation service returned {}: {}", status, body);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(map_transport_error)?;
        let text = parsed.response.trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(text)
    }
}

fn map_transport_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout
    } else if error.is_decode() {
        GenerationError::Decode(error.to_string())
    } else {
        GenerationError::Http(error)
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, context: &GenerationContext) -> Result<String, GenerationError> {
        debug!("Generating reply for task {:?} with model {}", context.task, self.model);

        let english = self.complete(&templates::generation_prompt(prompt, context)).await?;
        if !self.translate {
            return Ok(english);
        }

        self.complete(&templates::translation_prompt(&english)).await
    }
}

/// Stand-in used when no generation service is configured. Every call fails,
/// so replies come from the rule-based tier.
#[derive(Debug, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str, _context: &GenerationContext) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}

/// Ollama client from config, or [`UnconfiguredGenerator`] when the client
/// cannot be built.
pub fn generator_from_config(config: &AppConfig) -> Arc<dyn TextGenerator> {
    match OllamaGenerator::from_config(config) {
        Ok(generator) => Arc::new(generator),
        Err(e) => {
            warn!("Generation disabled, replies will be rule-based: {}", e);
            Arc::new(UnconfiguredGenerator)
        }
    }
}
