//! Plan suggestion client
//!
//! Talks to a generative suggestion backend: posts the serialized stop
//! list, gets back free text that should contain a SuggestedPlan-shaped
//! JSON object somewhere, and digs it out. No retry - a failed generation
//! surfaces one error and the caller decides whether to try again.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use tripstore::Stop;

use super::{SuggestedPlan, extract_json};
use crate::config::SuggestConfig;
use crate::error::PlanError;

/// Seam for the suggestion collaborator
#[async_trait]
pub trait PlanSuggester: Send + Sync {
    /// Request a suggested plan for the given stops
    async fn suggest(&self, stops: &[Stop]) -> Result<SuggestedPlan, PlanError>;
}

/// HTTP suggestion client
pub struct HttpPlanSuggester {
    base_url: String,
    http: Client,
}

impl HttpPlanSuggester {
    /// Create a client from configuration
    pub fn from_config(config: &SuggestConfig) -> Result<Self, PlanError> {
        debug!(base_url = %config.base_url, "from_config: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(PlanError::UpstreamUnavailable)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
        })
    }

    /// Build the request body: the stop list the backend plans around
    fn build_request_body(&self, stops: &[Stop]) -> serde_json::Value {
        debug!(stop_count = stops.len(), "build_request_body: called");
        serde_json::json!({ "stops": stops })
    }

    /// Dig a plan out of the backend's free-text response
    fn parse_response_text(&self, text: &str) -> Result<SuggestedPlan, PlanError> {
        if text.trim().is_empty() {
            debug!("parse_response_text: empty payload");
            return Err(PlanError::MalformedResponse("empty response text".to_string()));
        }

        let value = extract_json(text)?;
        Ok(SuggestedPlan::from_value(&value))
    }
}

#[async_trait]
impl PlanSuggester for HttpPlanSuggester {
    async fn suggest(&self, stops: &[Stop]) -> Result<SuggestedPlan, PlanError> {
        debug!(stop_count = stops.len(), "suggest: called");
        let body = self.build_request_body(stops);

        let response = self
            .http
            .post(self.base_url.clone())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "suggest: rejected");
            return Err(PlanError::UpstreamRejected {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        debug!(text_len = text.len(), "suggest: parsing response text");
        self.parse_response_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggester() -> HttpPlanSuggester {
        HttpPlanSuggester {
            base_url: "http://localhost:8080/suggest".to_string(),
            http: Client::new(),
        }
    }

    #[test]
    fn test_build_request_body() {
        let stops = vec![
            Stop::new("a", "Sigiriya", 7.957, 80.76),
            Stop::new("b", "Dambulla", 7.856, 80.651),
        ];

        let body = suggester().build_request_body(&stops);
        assert_eq!(body["stops"].as_array().unwrap().len(), 2);
        assert_eq!(body["stops"][0]["id"], "a");
        assert_eq!(body["stops"][1]["name"], "Dambulla");
        assert!(body["stops"][0]["lat"].is_f64());
    }

    #[test]
    fn test_parse_response_text_prose_wrapped() {
        let text = "Here you go:\n```json\n{\"order\": [\"b\", \"a\"], \"stayArea\": \"Dambulla\"}\n```";
        let plan = suggester().parse_response_text(text).unwrap();
        assert_eq!(plan.order, vec!["b", "a"]);
        assert_eq!(plan.stay_area, "Dambulla");
    }

    #[test]
    fn test_parse_response_text_empty_is_malformed() {
        let err = suggester().parse_response_text("   \n").unwrap_err();
        assert!(matches!(err, PlanError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_response_text_no_object_is_malformed() {
        let err = suggester().parse_response_text("I had trouble with that.").unwrap_err();
        assert!(matches!(err, PlanError::MalformedResponse(_)));
    }
}
