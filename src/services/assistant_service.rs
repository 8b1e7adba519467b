//! Text generation for club executives, backed by the Gemini REST API.
//!
//! Every call resolves to a string. Failures are logged and replaced by a
//! fixed fallback message so callers never see an error.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AssistantSettings;
use crate::models::ClubStats;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub const ANNOUNCEMENT_FAILED: &str =
    "Sorry, I am having trouble connecting to the AI service right now. Please ensure your API key is valid.";
pub const ANNOUNCEMENT_EMPTY: &str = "I couldn't generate the message. Please try again.";
pub const ANALYSIS_FAILED: &str = "Unable to perform analysis at this time.";
pub const ANALYSIS_EMPTY: &str = "Analysis unavailable.";

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct AnnouncementRequest {
    /// e.g. "Payment Reminder"
    pub topic: String,
    /// e.g. "Polite", "Urgent"
    pub tone: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn announcement_prompt(request: &AnnouncementRequest) -> String {
    format!(
        "You are an AI assistant for a club executive using the \"TitiMe\" finance app.\n\
         Please write a club announcement/message.\n\n\
         Topic: {}\n\
         Tone: {}\n\
         Details: {}\n\n\
         Keep it professional yet engaging. Format it for a group chat or email.\n\
         Do not include placeholders like [Your Name], just sign off as \"The Executive Team\".",
        request.topic, request.tone, request.details
    )
}

fn analysis_prompt(stats: &ClubStats) -> String {
    format!(
        "You are a financial advisor for a small society.\n\
         Analyze the following data and give 3 brief bullet points of advice.\n\n\
         Total Revenue: GHS {}\n\
         Pending Dues: GHS {}\n\
         Total Members: {}\n\n\
         Focus on cash flow and member retention.",
        stats.total_revenue, stats.pending_dues, stats.total_members
    )
}

#[derive(Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    settings: AssistantSettings,
}

impl AssistantClient {
    pub fn new(settings: AssistantSettings) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("⚠️  Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self { http, settings }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    pub async fn announcement(&self, request: &AnnouncementRequest) -> String {
        match self.generate(&announcement_prompt(request)).await {
            Ok(Some(text)) => text,
            Ok(None) => ANNOUNCEMENT_EMPTY.to_string(),
            Err(e) => {
                log::warn!("⚠️  Announcement generation failed: {}", e);
                ANNOUNCEMENT_FAILED.to_string()
            }
        }
    }

    pub async fn financial_analysis(&self, stats: &ClubStats) -> String {
        match self.generate(&analysis_prompt(stats)).await {
            Ok(Some(text)) => text,
            Ok(None) => ANALYSIS_EMPTY.to_string(),
            Err(e) => {
                log::warn!("⚠️  Financial analysis failed: {}", e);
                ANALYSIS_FAILED.to_string()
            }
        }
    }

    /// `Ok(None)` when the model answered with no text
    async fn generate(&self, prompt: &str) -> Result<Option<String>, String> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| "GEMINI_API_KEY is not set".to_string())?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        );
        let body = GenerateRequest {
            contents: [Content { parts: [Part { text: prompt }] }],
        };

        log::info!("🤖 Requesting text from {}", self.settings.model);
        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Failed to reach text service: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Text service error: {}", response.status()));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse text service response: {}", e))?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: String, api_key: Option<&str>) -> AssistantSettings {
        AssistantSettings {
            api_key: api_key.map(str::to_string),
            model: "gemini-2.5-flash".into(),
            base_url,
        }
    }

    fn request() -> AnnouncementRequest {
        AnnouncementRequest {
            topic: "Payment Reminder".into(),
            tone: "Polite".into(),
            details: "Dues are due Friday".into(),
        }
    }

    #[test]
    fn prompts_carry_inputs() {
        let prompt = announcement_prompt(&request());
        assert!(prompt.contains("Topic: Payment Reminder"));
        assert!(prompt.contains("The Executive Team"));

        let stats = ClubStats {
            total_members: 85,
            total_revenue: 3200.0,
            pending_dues: 150.0,
            active_subscriptions: 78,
        };
        let prompt = analysis_prompt(&stats);
        assert!(prompt.contains("Total Revenue: GHS 3200"));
        assert!(prompt.contains("Total Members: 85"));
    }

    #[tokio::test]
    async fn returns_generated_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "Hello members" }] } }]
            })))
            .mount(&server)
            .await;

        let client = AssistantClient::new(settings(server.uri(), Some("k")));
        assert_eq!(client.announcement(&request()).await, "Hello members");
    }

    #[tokio::test]
    async fn empty_answer_uses_empty_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let client = AssistantClient::new(settings(server.uri(), Some("k")));
        assert_eq!(client.announcement(&request()).await, ANNOUNCEMENT_EMPTY);
        assert_eq!(client.financial_analysis(&ClubStats::default()).await, ANALYSIS_EMPTY);
    }

    #[tokio::test]
    async fn server_error_uses_failure_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AssistantClient::new(settings(server.uri(), Some("k")));
        assert_eq!(client.announcement(&request()).await, ANNOUNCEMENT_FAILED);
        assert_eq!(client.financial_analysis(&ClubStats::default()).await, ANALYSIS_FAILED);
    }

    #[tokio::test]
    async fn missing_key_never_calls_out() {
        let client = AssistantClient::new(settings("http://127.0.0.1:9".into(), None));
        assert!(!client.is_configured());
        assert_eq!(client.announcement(&request()).await, ANNOUNCEMENT_FAILED);
    }
}
