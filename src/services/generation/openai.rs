/// OpenAI-compatible generation backend
///
/// Talks to any `/v1/chat/completions` endpoint. One user message per
/// call; when an image is supplied the message content switches to the
/// multi-part form with an `image_url` part alongside the text.
use reqwest::Client as HttpClient;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    services::generation::GenerationClient,
};

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.api_url.trim_end_matches('/')
        )
    }
}

/// Content of the single user message, in plain or multi-part form.
fn user_content(prompt: &str, image_url: Option<&str>) -> Value {
    match image_url {
        Some(image) => json!([
            {"type": "text", "text": prompt},
            {"type": "image_url", "image_url": {"url": image}},
        ]),
        None => json!(prompt),
    }
}

/// Reply text from `choices[0].message.content`, if present.
fn extract_reply(payload: &Value) -> Option<&str> {
    payload["choices"][0]["message"]["content"].as_str()
}

#[async_trait::async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(&self, prompt: &str, image_url: Option<&str>) -> AppResult<String> {
        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": user_content(prompt, image_url),
            }],
        });

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GenerationUnavailable(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GenerationUnavailable(format!(
                "Generator returned status {status}: {body}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::GenerationUnavailable(format!("Unreadable reply: {e}")))?;

        let text = extract_reply(&payload).ok_or_else(|| {
            AppError::GenerationUnavailable("Reply carries no message content".to_string())
        })?;

        tracing::info!(
            model = %self.model,
            reply_chars = text.len(),
            "Generation completed"
        );

        Ok(text.to_string())
    }
}
