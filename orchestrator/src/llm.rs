// orchestrator/src/llm.rs

use async_trait::async_trait;
use common_utils::LlmSettings;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use search_core::{OracleError, TextOracle};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[derive(Deserialize)]
struct ChatMessageContent {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageContent,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// `TextOracle` backed by an OpenAI-compatible `/v1/chat/completions`
/// endpoint. Every call is sent with temperature 0.
pub struct ChatCompletionsOracle {
    client: Client,
    chat_url: String,
    model: String,
}

impl ChatCompletionsOracle {
    pub fn new(settings: &LlmSettings) -> Result<Self, OracleError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = settings.api_key.as_deref() {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(OracleError::transport)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()
            .map_err(OracleError::transport)?;

        Ok(Self {
            client,
            chat_url: format!("{}/v1/chat/completions", settings.url.trim_end_matches('/')),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl TextOracle for ChatCompletionsOracle {
    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleError> {
        let request_body = json!({
            "model": self.model,
            "temperature": 0.0,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
        });

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request_body)
            .send()
            .await
            .map_err(OracleError::transport)?;

        let status = response.status();
        let response_text = response.text().await.map_err(OracleError::transport)?;
        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let chat_response: ChatCompletionResponse = serde_json::from_str(&response_text)
            .map_err(|e| {
                OracleError::MalformedResponse(format!("{e}. Raw text: {response_text}"))
            })?;
        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::MalformedResponse("response has no choices".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        debug!(chars = content.len(), "chat completion received");
        Ok(content.trim().to_string())
    }
}
