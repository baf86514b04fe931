//! Plan generator client
//!
//! Talks to an OpenAI-compatible chat completions endpoint (Groq by default)
//! in JSON mode. The returned text is parsed into a [`CandidatePlan`] but is
//! otherwise untrusted; callers must run it through `shared::validate_plan`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{parse_candidate_plan, CandidatePlan, OptimizerPrompt};

use crate::config::OptimizerConfig;
use crate::error::{AppError, AppResult};

/// Client for the external plan generator
#[derive(Clone)]
pub struct OptimizerClient {
    http_client: Client,
    api_endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OptimizerClient {
    /// Build a client from configuration; `None` when no API key is set
    pub fn from_config(config: &OptimizerConfig) -> AppResult<Option<Self>> {
        let Some(api_key) = config.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };

        let http_client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Some(Self {
            http_client,
            api_endpoint: config.api_endpoint.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the generator for a plan
    pub async fn generate_plan(&self, prompt: &OptimizerPrompt) -> AppResult<CandidatePlan> {
        let request = self.build_request(prompt);

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Plan generator request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalService(format!(
                "Plan generator returned {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse generator response: {}", e)))?;

        let content = extract_content(completion)?;
        parse_candidate_plan(&content)
            .map_err(|e| AppError::ExternalService(format!("Generator returned an unusable plan: {}", e)))
    }

    fn build_request<'a>(&'a self, prompt: &'a OptimizerPrompt) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat { kind: "json_object" },
        }
    }
}

fn extract_content(completion: ChatCompletionResponse) -> AppResult<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AppError::ExternalService("Empty response from plan generator".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> OptimizerConfig {
        OptimizerConfig {
            api_key: key.map(str::to_string),
            ..OptimizerConfig::default()
        }
    }

    #[test]
    fn test_client_disabled_without_key() {
        assert!(OptimizerClient::from_config(&config_with_key(None)).unwrap().is_none());
        assert!(OptimizerClient::from_config(&config_with_key(Some("  "))).unwrap().is_none());
    }

    #[test]
    fn test_request_uses_json_mode() {
        let client = OptimizerClient::from_config(&config_with_key(Some("gsk_test")))
            .unwrap()
            .unwrap();
        let prompt = OptimizerPrompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };

        let body = serde_json::to_value(client.build_request(&prompt)).unwrap();
        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_extract_content() {
        let completion: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "{\"summary\": \"s\", \"assignments\": []}"}}]}"#,
        )
        .unwrap();
        let content = extract_content(completion).unwrap();
        assert!(parse_candidate_plan(&content).is_ok());
    }

    #[test]
    fn test_extract_content_rejects_empty() {
        let completion: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(extract_content(completion), Err(AppError::ExternalService(_))));

        let blank: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": ""}}]}"#).unwrap();
        assert!(extract_content(blank).is_err());
    }
}
