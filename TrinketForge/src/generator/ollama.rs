//! Ollama chat client

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{GeneratorSettings, RoleSettings};
use crate::error::{Error, Result};

use super::{GenerationRequest, Generator, GeneratorRole};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    /// Unload the model right after answering
    keep_alive: u32,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Blocking client for `POST {endpoint}/api/chat`.
#[derive(Debug)]
pub struct OllamaGenerator {
    client: reqwest::blocking::Client,
    settings: GeneratorSettings,
}

impl OllamaGenerator {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    /// Returns [`Error::Generation`] if the HTTP client cannot be built.
    pub fn new(settings: GeneratorSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Generation {
                role: "client".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client, settings })
    }

    fn role_settings(&self, role: GeneratorRole) -> &RoleSettings {
        self.settings.role(role)
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.settings.endpoint.trim_end_matches('/'))
    }
}

impl Generator for OllamaGenerator {
    fn generate(&mut self, request: &GenerationRequest) -> Result<String> {
        let role = self.role_settings(request.role);
        let body = ChatRequest {
            model: &role.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            stream: false,
            keep_alive: 0,
            options: ChatOptions {
                temperature: role.temperature,
            },
        };

        let failed = |message: String| Error::Generation {
            role: request.role.to_string(),
            message,
        };

        tracing::debug!("Requesting {} from model {}", request.role, role.model);
        let response: ChatResponse = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| failed(e.to_string()))?
            .json()
            .map_err(|e| failed(format!("invalid response: {e}")))?;

        Ok(response.message.content)
    }
}
