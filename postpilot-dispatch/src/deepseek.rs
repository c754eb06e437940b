//! DeepSeek chat-completion relay.
//!
//! Sends a prompt (optionally augmented with the text of an uploaded file)
//! to the DeepSeek API, with a JSON context document injected into the
//! system prompt, and extracts the first choice's message content.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::error::DispatchError;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const MODEL: &str = "deepseek-chat";

#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    api_key: String,
    api_url: String,
    context_path: Option<PathBuf>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl DeepSeekClient {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        context_path: Option<PathBuf>,
    ) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
            context_path,
            client,
        })
    }

    /// Run one chat completion. `attachment` is the text of an uploaded file
    /// appended to the user prompt.
    pub async fn chat(
        &self,
        prompt: &str,
        attachment: Option<&str>,
    ) -> Result<String, DispatchError> {
        let context = self.read_context().await?;
        let system_prompt = format!(
            "You are a helpful assistant. Use the following data as context for answering questions. \
             MAKE SURE TO RETURN OUTPUT IN Markdown format. Use marketing or normal formatting based on the request:\n{context}"
        );

        let user_content = match attachment {
            Some(text) => format!("{prompt}\n\n[Attached File Contents]:\n{text}"),
            None => prompt.to_string(),
        };

        let body = json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_content},
            ],
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DispatchError::InvalidResponse(format!(
                "API returned status {status}: {body}"
            )));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| DispatchError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| DispatchError::InvalidResponse("no choices available".into()))
    }

    /// Pretty-print the configured context document, or an empty string when
    /// none is configured.
    async fn read_context(&self) -> Result<String, DispatchError> {
        let Some(ref path) = self.context_path else {
            return Ok(String::new());
        };
        let raw = tokio::fs::read_to_string(path).await?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| DispatchError::InvalidResponse(format!("context is not JSON: {e}")))?;
        serde_json::to_string_pretty(&value)
            .map_err(|e| DispatchError::InvalidResponse(e.to_string()))
    }
}
