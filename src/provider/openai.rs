use super::{truncate_body, Adapter, AdapterOptions};
use crate::error::AdapterError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions adapter for any OpenAI-compatible endpoint
pub struct OpenAiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    reasoning_effort: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiAdapter {
    pub fn new(
        model: String,
        api_key: String,
        base_url: Option<String>,
        reasoning_effort: Option<String>,
        opts: &AdapterOptions,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(opts.timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model,
            max_tokens: opts.max_tokens,
            reasoning_effort,
        })
    }
}

#[async_trait]
impl Adapter for OpenAiAdapter {
    async fn request(&self, image: &Path, prompt: &str) -> Result<String, AdapterError> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|e| AdapterError::ImageRead {
                path: image.to_path_buf(),
                source: e,
            })?;
        let img_b64 = STANDARD.encode(bytes);

        let mut body = json!({
            "model": self.model,
            "max_completion_tokens": self.max_tokens,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an expert physics simulator that predicts bucket outcomes.",
                },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": prompt },
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:image/png;base64,{}", img_b64),
                                "detail": "auto",
                            },
                        },
                    ],
                },
            ],
        });
        if let Some(effort) = &self.reasoning_effort {
            body["reasoning_effort"] = json!(effort);
        }

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdapterError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: ChatResponse = resp.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                AdapterError::MalformedResponse("chat completion had no message content".to_string())
            })
    }
}
