//! 通用HTTP生成接口
//!
//! 请求：`POST endpoint`，Bearer鉴权，JSON体 `{prompt, model, max_output_tokens}`。
//! 响应：带 `output` 字段的JSON时取该字段，否则整个响应体就是输出。

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::{GenerationClient, GenerationRequest};
use crate::config::GenerationConfig;
use crate::error::{DocsmithError, Result};

#[derive(Debug, Serialize)]
struct GeneratePayload<'a> {
    prompt: String,
    model: &'a str,
    max_output_tokens: u32,
}

#[derive(Clone)]
pub struct HttpGenerationClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpGenerationClient {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

/// 取出响应中的生成文本
fn extract_output(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("output") {
            Some(Value::String(output)) => output.clone(),
            Some(other) => other.to_string(),
            None => Value::Object(map).to_string(),
        },
        _ => body.to_string(),
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let payload = GeneratePayload {
            prompt: request.combined_prompt(),
            model: &self.model,
            max_output_tokens: request.max_output_tokens,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            prompt_len = payload.prompt.len(),
            "calling generation service"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocsmithError::HttpStatus {
                service: "generation service",
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(extract_output(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: "SYSTEM".into(),
            user: "USER".into(),
            max_output_tokens: 800,
            timeout: Duration::from_secs(5),
        }
    }

    fn client_for(url: String) -> HttpGenerationClient {
        let config = GenerationConfig {
            endpoint: url,
            api_key: "secret".into(),
            model: "gemini-2.5-flash".into(),
            ..Default::default()
        };
        HttpGenerationClient::new(&config)
    }

    #[test]
    fn test_extract_output_prefers_output_field() {
        assert_eq!(extract_output(r#"{"output":"{\"a\":1}"}"#), r#"{"a":1}"#);
    }

    #[test]
    fn test_extract_output_falls_back_to_whole_body() {
        let body = r#"{"articleTitle":"X","researchSteps":[]}"#;
        let out: Value = serde_json::from_str(&extract_output(body)).unwrap();
        assert_eq!(out["articleTitle"], "X");
    }

    #[test]
    fn test_extract_output_non_json_body_is_passed_through() {
        assert_eq!(extract_output("plain text"), "plain text");
    }

    #[tokio::test]
    async fn test_generate_sends_bearer_and_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/generate")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "prompt": "SYSTEM\n\nUSER",
                "model": "gemini-2.5-flash",
                "max_output_tokens": 800
            })))
            .with_status(200)
            .with_body(r#"{"output":"hello"}"#)
            .create_async()
            .await;

        let client = client_for(format!("{}/v1/generate", server.url()));
        let output = client.generate(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(output, "hello");
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/generate")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = client_for(format!("{}/v1/generate", server.url()));
        let err = client.generate(&request()).await.unwrap_err();
        match err {
            DocsmithError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
