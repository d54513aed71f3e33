//! OpenAI generation capability
//!
//! Chat completions with a forced function call whose parameters are the
//! record JSON Schema. The function arguments are shaped into a record at the
//! schema boundary; any failure along the way is a [`GenerationError`].

use crate::capability::GenerationCapability;
use crate::config::LexisConfig;
use crate::error::GenerationError;
use crate::types::ModelSelector;
use async_trait::async_trait;
use lexis_record::{record_json_schema, DecompositionRecord, SCHEMA_DESCRIPTION, SCHEMA_NAME};
use serde::Deserialize;
use serde_json::{json, Value};

/// Response envelope, reduced to what is read
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
    // Some compatible servers send `null` instead of omitting the field
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    // Arguments arrive as a JSON string
    arguments: String,
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(1000) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// User prompt for `word`
#[must_use]
pub fn user_prompt(word: &str) -> String {
    format!("Analyze the word: {word}")
}

/// OpenAI-compatible chat completions client
#[derive(Clone)]
pub struct OpenAiCapability {
    api_key: Option<String>,
    client: reqwest::Client,
    model: ModelSelector,
    api_base: String,
    temperature: f64,
}

impl std::fmt::Debug for OpenAiCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCapability")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl OpenAiCapability {
    /// Create a client from configuration and an optional credential
    ///
    /// A missing or blank credential is not rejected here; every `generate`
    /// call then fails with `GenerationError::MissingCredential`.
    ///
    /// # Errors
    /// `GenerationError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &LexisConfig, api_key: Option<String>) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            temperature: config.temperature,
        })
    }

    /// Create a client reading the credential from the configured variable
    ///
    /// # Errors
    /// Same as [`Self::new`].
    pub fn from_env(config: &LexisConfig) -> Result<Self, GenerationError> {
        Self::new(config, config.api_key())
    }

    /// Model in use
    #[inline]
    #[must_use]
    pub fn model(&self) -> &ModelSelector {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// Request body for one generation call
    #[must_use]
    pub fn request_body(&self, word: &str, instruction: &str) -> Value {
        json!({
            "model": self.model.as_str(),
            "messages": [
                {"role": "system", "content": instruction},
                {"role": "user", "content": user_prompt(word)}
            ],
            "temperature": self.temperature,
            "tools": [{
                "type": "function",
                "function": {
                    "name": SCHEMA_NAME,
                    "description": SCHEMA_DESCRIPTION,
                    "parameters": record_json_schema()
                }
            }],
            "tool_choice": {"type": "function", "function": {"name": SCHEMA_NAME}}
        })
    }

    /// Extract a record from a raw response body
    ///
    /// Function-call arguments are preferred; plain message content is used
    /// when the model answered without calling the function.
    ///
    /// # Errors
    /// - `GenerationError::MalformedResponse` if the envelope does not parse
    /// - `GenerationError::EmptyResponse` if there is no structured output
    /// - `GenerationError::Schema` if the output is not a record
    pub fn parse_response(body: &str) -> Result<DecompositionRecord, GenerationError> {
        let response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(GenerationError::EmptyResponse)?;

        let non_blank = |text: &String| !text.trim().is_empty();
        let payload = message
            .tool_calls
            .into_iter()
            .flatten()
            .next()
            .map(|call| call.function.arguments)
            .filter(non_blank)
            .or_else(|| message.content.filter(non_blank))
            .ok_or(GenerationError::EmptyResponse)?;

        tracing::debug!(arguments = %payload, "model structured output");
        Ok(DecompositionRecord::from_json(&payload)?)
    }
}

#[async_trait]
impl GenerationCapability for OpenAiCapability {
    async fn generate(
        &self,
        word: &str,
        instruction: &str,
    ) -> Result<DecompositionRecord, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&self.request_body(word, instruction))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        tracing::debug!(
            model = %self.model,
            response = %preview(&text),
            "model raw response"
        );
        Self::parse_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn capability(api_key: Option<&str>) -> OpenAiCapability {
        OpenAiCapability::new(&LexisConfig::default(), api_key.map(str::to_string)).unwrap()
    }

    #[test]
    fn request_body_forces_record_function() {
        let body = capability(Some("sk-test")).request_body("telephone", "RULES");
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["content"], "RULES");
        assert_eq!(body["messages"][1]["content"], "Analyze the word: telephone");
        assert_eq!(body["tools"][0]["function"]["name"], SCHEMA_NAME);
        assert_eq!(body["tool_choice"]["function"]["name"], SCHEMA_NAME);
        assert!(body["tools"][0]["function"]["parameters"]["properties"]["parts"].is_object());
    }

    #[test]
    fn parses_tool_call_arguments() {
        let arguments = DecompositionRecord::fallback().to_pretty_json();
        let body = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": SCHEMA_NAME, "arguments": arguments}
                    }]
                }
            }]
        });
        let record = OpenAiCapability::parse_response(&body.to_string()).unwrap();
        assert_eq!(record, DecompositionRecord::fallback());
    }

    #[test]
    fn parses_plain_content() {
        let body = json!({
            "choices": [{"message": {"content": "{\"thought\": \"t\"}"}}]
        });
        let record = OpenAiCapability::parse_response(&body.to_string()).unwrap();
        assert_eq!(record.thought, "t");
    }

    #[test]
    fn parses_plain_content_with_null_tool_calls() {
        let body = json!({
            "choices": [{"message": {"content": "{\"thought\": \"t\"}", "tool_calls": null}}]
        });
        let record = OpenAiCapability::parse_response(&body.to_string()).unwrap();
        assert_eq!(record.thought, "t");
    }

    #[test]
    fn blank_tool_arguments_fall_back_to_content() {
        let body = json!({
            "choices": [{
                "message": {
                    "content": "{\"thought\": \"from content\"}",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": SCHEMA_NAME, "arguments": "  "}
                    }]
                }
            }]
        });
        let record = OpenAiCapability::parse_response(&body.to_string()).unwrap();
        assert_eq!(record.thought, "from content");
    }

    #[test]
    fn blank_arguments_and_no_content_is_empty_response() {
        let body = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{"function": {"name": SCHEMA_NAME, "arguments": ""}}]
                }
            }]
        });
        let err = OpenAiCapability::parse_response(&body.to_string()).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[test]
    fn temperature_is_sent_exactly() {
        let body = capability(Some("sk-test")).request_body("telephone", "RULES");
        assert_eq!(body["temperature"], json!(0.1));
    }

    #[test]
    fn no_choices_is_empty_response() {
        let err = OpenAiCapability::parse_response(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[test]
    fn non_record_output_is_schema_error() {
        let body = json!({
            "choices": [{"message": {"content": "[1, 2, 3]"}}]
        });
        let err = OpenAiCapability::parse_response(&body.to_string()).unwrap_err();
        assert!(matches!(err, GenerationError::Schema(_)));
    }

    #[test]
    fn garbage_envelope_is_malformed() {
        let err = OpenAiCapability::parse_response("<html>").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn missing_credential_fails_without_network() {
        let err = capability(Some("  "))
            .generate("telephone", "RULES")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredential));
    }
}
