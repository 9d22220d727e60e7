//! Quote provider backed by the Gemini `generateContent` endpoint.
//!
//! - Sends the prompt with a JSON response schema so the model answers with a Quote object.
//! - Validates the answer before it reaches the session; nothing partial is returned.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::domain::{Quote, QuoteRequest};
use crate::infra::prompt::build_prompt;
use crate::infra::provider::{ProviderError, QuoteProvider};
use crate::util::{config::AppConfig, version::user_agent};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: Url,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::Unknown("API key not configured".to_string()))?;
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: Url::parse(&config.base_url)?,
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> Result<Url, ProviderError> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        Ok(self.base_url.join(&path)?)
    }

    async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        let response = self
            .http
            .post(self.endpoint()?)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::Transport(format!(
                "Gemini returned {status}: {detail}"
            )));
        }

        let payload: GenerateResponse = response.json().await?;
        response_text(payload)
    }
}

#[async_trait]
impl QuoteProvider for GeminiClient {
    async fn request_quote(&self, request: &QuoteRequest) -> Result<Quote, ProviderError> {
        info!(
            token = %request.token,
            model = %self.model,
            refresh = request.previous.is_some(),
            "requesting quote from Gemini"
        );
        let prompt = build_prompt(request);
        debug!(token = %request.token, "prompt:\n{prompt}");

        match self.generate(prompt).await.and_then(|text| parse_quote(&text)) {
            Ok(quote) => Ok(quote),
            Err(err) => {
                error!(token = %request.token, "error generating quote from Gemini: {err}");
                Err(err)
            }
        }
    }
}

fn response_text(payload: GenerateResponse) -> Result<String, ProviderError> {
    let text: String = payload
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::Format("response contained no text".into()));
    }
    Ok(trimmed.to_string())
}

/// Parses and validates the model's JSON answer.
pub fn parse_quote(text: &str) -> Result<Quote, ProviderError> {
    let value: Value = serde_json::from_str(text.trim())?;

    let has_part_name = value
        .get("partName")
        .and_then(Value::as_str)
        .map(|name| !name.trim().is_empty())
        .unwrap_or(false);
    let has_breakdown = value
        .get("costBreakdown")
        .map(Value::is_array)
        .unwrap_or(false);
    if !has_part_name || !has_breakdown {
        return Err(ProviderError::Format(
            "AI response is not in the expected format.".into(),
        ));
    }

    Ok(serde_json::from_value(value)?)
}

pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "partName": { "type": "STRING" },
            "material": { "type": "STRING" },
            "manufacturingProcess": { "type": "STRING" },
            "finish": { "type": "STRING" },
            "costBreakdown": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": { "type": "STRING" },
                        "cost": { "type": "NUMBER" }
                    },
                    "required": ["item", "cost"]
                }
            },
            "totalCost": { "type": "NUMBER" },
            "leadTime": { "type": "STRING" },
            "assumptions": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": [
            "partName",
            "material",
            "manufacturingProcess",
            "finish",
            "costBreakdown",
            "totalCost",
            "leadTime",
            "assumptions"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
        {
            "partName": "Motor Mount",
            "material": "Aluminum 6061-T6",
            "manufacturingProcess": "3-Axis CNC Milling",
            "finish": "As Machined",
            "costBreakdown": [
                {"item": "Setup Costs", "cost": 150},
                {"item": "Material Costs", "cost": 42.5},
                {"item": "Machining Costs", "cost": 210}
            ],
            "totalCost": 402.5,
            "leadTime": "10 business days",
            "assumptions": ["Part fits a 15cm x 10cm x 5cm envelope"]
        }
    "#;

    #[test]
    fn parses_well_formed_answer() {
        let quote = parse_quote(VALID).unwrap();
        assert_eq!(quote.part_name, "Motor Mount");
        assert_eq!(quote.cost_breakdown.len(), 3);
        assert_eq!(quote.total_cost, 402.5);
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            parse_quote("Sorry, I cannot help with that."),
            Err(ProviderError::Format(_))
        ));
    }

    #[test]
    fn rejects_missing_part_name_or_breakdown() {
        let no_name = VALID.replace("\"partName\": \"Motor Mount\",", "");
        assert!(matches!(parse_quote(&no_name), Err(ProviderError::Format(_))));

        let bad_breakdown = r#"{"partName": "X", "costBreakdown": "n/a"}"#;
        assert!(matches!(
            parse_quote(bad_breakdown),
            Err(ProviderError::Format(_))
        ));
    }

    #[test]
    fn rejects_incomplete_quote() {
        let partial = r#"{"partName": "X", "costBreakdown": []}"#;
        assert!(matches!(parse_quote(partial), Err(ProviderError::Format(_))));
    }

    #[test]
    fn extracts_candidate_text() {
        let payload: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "  {\"a\":" }, { "text": "1}\n" }] }
            }]
        }))
        .unwrap();
        assert_eq!(response_text(payload).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn empty_candidates_are_a_format_error() {
        let payload: GenerateResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(response_text(payload), Err(ProviderError::Format(_))));
    }

    #[test]
    fn schema_requires_every_field() {
        let schema = response_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 8);
        assert_eq!(schema["properties"]["totalCost"]["type"], "NUMBER");
    }

    #[test]
    fn missing_api_key_is_rejected() {
        assert!(GeminiClient::new(&AppConfig::default()).is_err());
    }

    #[test]
    fn endpoint_targets_configured_model() {
        let config = AppConfig {
            api_key: Some("key".into()),
            ..AppConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
