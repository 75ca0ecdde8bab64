use crate::models::analysis::AiAnalysis;
use crate::models::ticket::Ticket;
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Placeholder returned for an empty collection; the service is not called.
const NO_DATA_PLACEHOLDER: &str = "Not enough data for insights.";
/// Placeholder returned when the service responds with no text.
const NO_INSIGHTS_PLACEHOLDER: &str = "No insights generated.";

/// Gateway failure taxonomy. Transport failures and response-shape failures
/// are distinct so callers can message them differently; neither is ever
/// retried automatically.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI credential missing: set GEMINI_API_KEY")]
    MissingApiKey,
    #[error("AI service unreachable: {0}")]
    Transport(String),
    #[error("invalid AI response: {0}")]
    InvalidResponse(String),
}

/// Client for the external completion service. One per process: built
/// lazily from the environment on first use, reused for every request
/// (see [`AiGateway::shared`]).
pub struct AiGateway {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

static SHARED: OnceLock<AiGateway> = OnceLock::new();

impl AiGateway {
    /// Read configuration from the environment. A missing credential is not
    /// an error here; it surfaces per-request as [`AiError::MissingApiKey`].
    pub fn from_env() -> Self {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_MODEL, std::env::var(API_KEY_VAR).ok())
    }

    /// Explicit construction for tests and alternate endpoints.
    pub fn with_config(base_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        }
    }

    /// Process-wide handle, constructed once and never recreated mid-session.
    pub fn shared() -> &'static AiGateway {
        SHARED.get_or_init(AiGateway::from_env)
    }

    /// Request structured root-cause feedback for a single ticket. The
    /// result is for display only; nothing here touches the ticket store.
    pub async fn analyze_ticket(&self, ticket: &Ticket) -> Result<AiAnalysis, AiError> {
        let prompt = format!(
            "Analyze this rework ticket and provide structural feedback.\n\
             Title: {}\n\
             Description: {}\n\
             Department: {}",
            ticket.title, ticket.description, ticket.department
        );

        let config = json!({
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "suggestion": {
                        "type": "STRING",
                        "description": "A constructive suggestion to fix the root cause."
                    },
                    "estimatedRisk": {
                        "type": "STRING",
                        "description": "Risk assessment: Low, Medium, or High."
                    },
                    "preventiveMeasures": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "List of actions to prevent this from recurring."
                    },
                    "category": {
                        "type": "STRING",
                        "description": "Categorize this error (e.g., Human Error, Machine Failure, Material Defect)."
                    }
                },
                "required": ["suggestion", "estimatedRisk", "preventiveMeasures", "category"]
            }
        });

        let text = self.generate(&prompt, Some(config)).await?;
        decode_analysis(&text)
    }

    /// One prompt over the whole collection, asking for the most critical
    /// recurring pattern and one process improvement. The "at least two
    /// tickets" precondition is advisory and enforced by the caller, so a
    /// single ticket still goes out to the service.
    pub async fn aggregate_insights(&self, tickets: &[Ticket]) -> Result<String, AiError> {
        if tickets.is_empty() {
            return Ok(NO_DATA_PLACEHOLDER.to_string());
        }

        let summary = tickets
            .iter()
            .map(|t| format!("- {} ({}): {}", t.title, t.department, t.description))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Based on the following list of rework tickets, identify the most \
             critical recurring patterns and suggest one major process improvement \
             to reduce overall rework costs.\n\nTickets:\n{summary}"
        );

        let text = self.generate(&prompt, None).await?;
        if text.trim().is_empty() {
            return Ok(NO_INSIGHTS_PLACEHOLDER.to_string());
        }
        Ok(text)
    }

    /// POST one generateContent request and pull out the candidate text.
    /// An empty string means the service answered without content; shaping
    /// that into a placeholder or a decode failure is the caller's call.
    async fn generate(&self, prompt: &str, generation_config: Option<Value>) -> Result<String, AiError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(AiError::MissingApiKey)?;

        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        if let Some(config) = generation_config {
            body["generationConfig"] = config;
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Bad or revoked credentials land here as non-success statuses.
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Transport(format!("HTTP {status}: {detail}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        Ok(extract_text(&payload))
    }
}

/// First candidate's text from a generateContent payload, or empty.
fn extract_text(payload: &Value) -> String {
    payload
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Decode the model's JSON payload into a fully-populated result. Malformed
/// JSON or a missing required field is a shape failure, distinct from
/// transport failure; a partially-filled result is never produced.
fn decode_analysis(raw: &str) -> Result<AiAnalysis, AiError> {
    serde_json::from_str(raw).map_err(|e| AiError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ticket::{Priority, Status};

    fn sample_ticket() -> Ticket {
        Ticket {
            id: "t-1".to_string(),
            title: "Burr on machined flange".to_string(),
            description: "Deburr station missed the inner edge".to_string(),
            department: "Machining".to_string(),
            priority: Priority::High,
            status: Status::Pending,
            cost: 40.0,
            hours: 0.75,
            created_at: "2026-08-01T09:30:00+00:00".to_string(),
            root_cause: None,
        }
    }

    fn unconfigured_gateway() -> AiGateway {
        AiGateway::with_config("http://127.0.0.1:1", "test-model", None)
    }

    #[test]
    fn decodes_complete_payload() {
        let raw = r#"{
            "suggestion": "Add a deburr checklist step",
            "estimatedRisk": "Medium",
            "preventiveMeasures": ["Rotate tooling weekly", "Inspect inner edges"],
            "category": "Human Error"
        }"#;

        let analysis = decode_analysis(raw).unwrap();
        assert_eq!(analysis.category, "Human Error");
        assert_eq!(analysis.preventive_measures.len(), 2);
    }

    #[test]
    fn missing_required_field_is_a_shape_failure() {
        let raw = r#"{
            "suggestion": "Add a deburr checklist step",
            "estimatedRisk": "Medium",
            "preventiveMeasures": []
        }"#;

        let err = decode_analysis(raw).unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(_)));
    }

    #[test]
    fn malformed_payload_is_a_shape_failure() {
        assert!(matches!(
            decode_analysis("I cannot answer that."),
            Err(AiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn extracts_candidate_text() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "hello" }] } }]
        });
        assert_eq!(extract_text(&payload), "hello");
        assert_eq!(extract_text(&json!({})), "");
    }

    #[tokio::test]
    async fn empty_collection_returns_placeholder_without_calling_service() {
        // No credential configured: a network attempt would fail, so an Ok
        // here proves the service was never contacted.
        let gateway = unconfigured_gateway();
        let insights = gateway.aggregate_insights(&[]).await.unwrap();
        assert_eq!(insights, NO_DATA_PLACEHOLDER);
    }

    #[tokio::test]
    async fn single_ticket_still_attempts_the_service() {
        let gateway = unconfigured_gateway();
        let err = gateway.aggregate_insights(&[sample_ticket()]).await.unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey));
    }

    #[tokio::test]
    async fn missing_credential_fails_per_ticket_analysis() {
        let gateway = unconfigured_gateway();
        let err = gateway.analyze_ticket(&sample_ticket()).await.unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey));
    }
}
