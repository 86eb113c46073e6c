//! Blocking text classifier used by the memory gate.
//!
//! The production client talks to an OpenAI-compatible chat completions API
//! with `reqwest::blocking`. It must be built outside the async runtime and is
//! only ever called from a blocking task.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::memory::core::errors::ClassifierError;

/// HTTP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// HTTP client timeout for a classification call.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

/// A synchronous text classifier.
pub trait TextClassifier: Send + Sync {
    /// Model identifier, reported in gate logs.
    fn model(&self) -> &str;

    /// Classify `user_text` under `system_prompt` and return the raw model output.
    ///
    /// Blocks the calling thread.
    ///
    /// # Errors
    /// Returns an error if the call fails or yields no output.
    fn classify(&self, system_prompt: &str, user_text: &str) -> Result<String, ClassifierError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClassifier {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    /// Create a classifier for `model` behind `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(CLIENT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

impl TextClassifier for OpenAiClassifier {
    fn model(&self) -> &str {
        &self.model
    }

    fn classify(&self, system_prompt: &str, user_text: &str) -> Result<String, ClassifierError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let parsed: ChatResponse = response.json()?;
        first_reply(parsed)
    }
}

fn first_reply(response: ChatResponse) -> Result<String, ClassifierError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(ClassifierError::EmptyResponse)
}
