use super::{truncate_body, Adapter, AdapterOptions};
use crate::error::AdapterError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Vision adapter for the Anthropic Messages API
pub struct AnthropicAdapter {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    thinking_budget: u32,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicAdapter {
    pub fn new(
        model: String,
        api_key: String,
        thinking_budget: u32,
        opts: &AdapterOptions,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(opts.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            max_tokens: opts.max_tokens,
            thinking_budget,
        })
    }
}

#[async_trait]
impl Adapter for AnthropicAdapter {
    async fn request(&self, image: &Path, prompt: &str) -> Result<String, AdapterError> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|e| AdapterError::ImageRead {
                path: image.to_path_buf(),
                source: e,
            })?;
        let img_b64 = STANDARD.encode(bytes);

        let thinking = if self.thinking_budget > 0 {
            json!({ "type": "enabled", "budget_tokens": self.thinking_budget })
        } else {
            json!({ "type": "disabled" })
        };

        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "thinking": thinking,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "image",
                            "source": {
                                "type": "base64",
                                "media_type": "image/png",
                                "data": img_b64,
                            },
                        },
                        { "type": "text", "text": prompt },
                    ],
                },
            ],
        });

        let resp = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
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

        let parsed: MessagesResponse = resp.json().await?;
        // Thinking blocks precede the answer; take the last text block
        parsed
            .content
            .iter()
            .rev()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text.clone())
            .ok_or_else(|| AdapterError::MalformedResponse("message had no text content".to_string()))
    }
}
