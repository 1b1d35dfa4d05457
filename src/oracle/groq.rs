// src/oracle/groq.rs
// =============================================================================
// Groq-backed content oracle.
//
// Sends the (truncated) page text to a chat completion endpoint with a
// prompt that asks for a one-word answer, then reads "YES..." as keep and
// anything else as skip.
//
// The API key is optional on purpose: without one the crawler still runs,
// every classify() call just fails closed to `false` with a warning.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{truncate_chars, ContentOracle, MAX_ORACLE_INPUT_CHARS};
use crate::error::OracleError;

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const PROMPT_PREAMBLE: &str = "You are an AI that helps decide if website content is worth storing \
    for a knowledge base. Respond with only 'YES' if it is relevant and \
    valuable, or 'NO' if it is trivial, off-topic, or unnecessary.";

#[derive(Debug, Clone)]
pub struct GroqSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GroqSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct GroqOracle {
    client: Client,
    settings: GroqSettings,
}

impl GroqOracle {
    pub fn new(settings: GroqSettings) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| OracleError::Network(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// Same as `classify`, but with the failure still visible.
    pub async fn try_classify(&self, text: &str) -> Result<bool, OracleError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(OracleError::MissingCredential)?;

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(text),
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.settings.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Parse(e.to_string()))?;

        let answer = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| OracleError::Parse("response had no choices".into()))?;

        debug!(answer = %answer.trim(), "oracle verdict");
        Ok(is_affirmative(&answer))
    }
}

#[async_trait]
impl ContentOracle for GroqOracle {
    async fn classify(&self, text: &str) -> bool {
        match self.try_classify(text).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, "oracle failed, treating page as not worth saving");
                false
            }
        }
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "{}\n\nContent:\n{}",
        PROMPT_PREAMBLE,
        truncate_chars(text, MAX_ORACLE_INPUT_CHARS)
    )
}

// "YES", "yes.", " Yes, this is useful" all count; "NO" or anything else doesn't
fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_uppercase().starts_with("YES")
}
