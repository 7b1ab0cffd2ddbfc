use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Source;

/// Production endpoint for the Gemini REST API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fast model used for the connectivity check.
pub const FLASH_MODEL: &str = "gemini-3-flash-preview";

/// Reasoning model used for the full weather report.
pub const PRO_MODEL: &str = "gemini-3-pro-preview";

/// Fixed greeting sent by [`GeminiClient::hello`].
pub const HELLO_PROMPT: &str = "Hello from AeroCast Pro";

/// A single generate-content request.
///
/// Built field by field rather than templated into a JSON string, so a
/// location like `"Mumbai"} , "tools": ...` stays inert prompt text.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub search_grounding: bool,
    pub response_mime_type: Option<String>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            search_grounding: false,
            response_mime_type: None,
        }
    }

    /// Let the model consult live Google Search results.
    pub fn with_search_grounding(mut self) -> Self {
        self.search_grounding = true;
        self
    }

    /// Ask the service to emit `application/json` instead of prose.
    pub fn with_json_response(mut self) -> Self {
        self.response_mime_type = Some("application/json".to_string());
        self
    }

    fn to_wire(&self) -> WireRequest {
        WireRequest {
            contents: vec![WireContent {
                role: "user".to_string(),
                parts: vec![WirePart { text: self.prompt.clone() }],
            }],
            tools: self
                .search_grounding
                .then(|| vec![WireTool { google_search: WireGoogleSearch {} }]),
            generation_config: self
                .response_mime_type
                .as_ref()
                .map(|mime| WireGenerationConfig { response_mime_type: mime.clone() }),
        }
    }
}

/// What a generate-content call produced: the text payload plus any
/// search-grounding attributions the service returned alongside it.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
    pub sources: Vec<Source>,
}

/// Thin handle over the Gemini REST API.
///
/// Holds the credential and a shared `reqwest::Client`; immutable after
/// construction. One request in flight at a time is all the callers need.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at a different endpoint. Used by tests to
    /// target a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fixed-prompt connectivity check against the flash model.
    pub async fn hello(&self) -> Result<String> {
        let request = GenerateRequest::new(FLASH_MODEL, HELLO_PROMPT);
        Ok(self.generate(&request).await?.text)
    }

    /// Send one generate-content request and block until the service
    /// answers. No retries; transport and remote failures map straight
    /// to [`Error`] variants.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );

        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request.to_wire())
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        let parsed: WireResponse = serde_json::from_str(&body)?;
        extract_response(parsed)
    }
}

/// Pull the text payload and grounding attributions out of a decoded
/// response. A response with no candidates or no text part is an
/// [`Error::EmptyResponse`], not a silent empty string.
fn extract_response(response: WireResponse) -> Result<GenerateResponse> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(Error::EmptyResponse)?;

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|text| !text.is_empty())
        .ok_or(Error::EmptyResponse)?;

    let sources = candidate
        .grounding_metadata
        .map(|meta| {
            meta.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .map(|web| Source {
                    title: web.title.unwrap_or_else(|| web.uri.clone()),
                    uri: web.uri,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(GenerateResponse { text, sources })
}

#[derive(Debug, Serialize)]
struct WireRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    role: String,
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePart {
    text: String,
}

#[derive(Debug, Serialize)]
struct WireTool {
    google_search: WireGoogleSearch,
}

#[derive(Debug, Serialize)]
struct WireGoogleSearch {}

#[derive(Debug, Serialize)]
struct WireGenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    content: Option<WireCandidateContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<WireGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
struct WireGroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<WireGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct WireGroundingChunk {
    web: Option<WireWebSource>,
}

#[derive(Debug, Deserialize)]
struct WireWebSource {
    uri: String,
    title: Option<String>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn wire_json(request: &GenerateRequest) -> Value {
        serde_json::to_value(request.to_wire()).expect("request must serialize")
    }

    #[test]
    fn plain_request_has_no_tools_or_generation_config() {
        let body = wire_json(&GenerateRequest::new(FLASH_MODEL, HELLO_PROMPT));

        assert_eq!(body["contents"][0]["parts"][0]["text"], HELLO_PROMPT);
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body.get("tools").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn search_grounding_adds_google_search_tool() {
        let request = GenerateRequest::new(PRO_MODEL, "weather").with_search_grounding();
        let body = wire_json(&request);

        assert_eq!(body["tools"], json!([{ "google_search": {} }]));
    }

    #[test]
    fn json_response_sets_mime_type() {
        let request = GenerateRequest::new(PRO_MODEL, "weather").with_json_response();
        let body = wire_json(&request);

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn hostile_prompt_stays_inert_text() {
        let location = r#"Mumbai"}], "tools": [{"google_search": {}}]"#;
        let request = GenerateRequest::new(FLASH_MODEL, location);
        let body = wire_json(&request);

        // The whole string lands inside the text field, nothing leaks
        // into the request structure.
        assert_eq!(body["contents"][0]["parts"][0]["text"], location);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn extract_joins_parts_and_maps_sources() {
        let wire: WireResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "28" }, { "text": "°C" }], "role": "model" },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://imd.gov.in", "title": "IMD" } },
                        { "web": { "uri": "https://cpcb.nic.in" } },
                        {}
                    ]
                }
            }]
        }))
        .unwrap();

        let response = extract_response(wire).expect("must extract");
        assert_eq!(response.text, "28°C");
        assert_eq!(response.sources.len(), 2);
        assert_eq!(response.sources[0].title, "IMD");
        // Title falls back to the URI when the chunk has none.
        assert_eq!(response.sources[1].title, "https://cpcb.nic.in");
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let wire: WireResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(extract_response(wire), Err(Error::EmptyResponse)));
    }

    #[test]
    fn candidate_without_text_is_empty_response() {
        let wire: WireResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [], "role": "model" } }]
        }))
        .unwrap();
        assert!(matches!(extract_response(wire), Err(Error::EmptyResponse)));
    }

    #[test]
    fn truncate_body_caps_long_errors() {
        let long = "x".repeat(500);
        let short = truncate_body(&long);
        assert!(short.len() <= 203);
        assert!(short.ends_with("..."));
        assert_eq!(truncate_body("tiny"), "tiny");
    }
}
