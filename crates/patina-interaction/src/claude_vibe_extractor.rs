//! ClaudeVibeExtractor - vibe extraction through the Claude messages API.
//!
//! Each request sends the item (as an image block or a text prompt) together
//! with instructions asking for a single JSON object, then parses and
//! validates the reply.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use patina_core::canvas::ContributingKind;
use patina_core::config::ExtractorConfig;
use patina_core::extraction::{ExtractionRequest, VibeExtractor};
use patina_core::vibe::VibeContribution;
use patina_core::{PatinaError, Result};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::parse::parse_contribution;

const BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const RESPONSE_FORMAT: &str = r##"Respond with ONLY a JSON object, no markdown and no commentary, shaped exactly like this:
{
  "colors": ["#rrggbb", ...],
  "mood_tags": ["tag", ...],
  "aesthetic_tags": ["tag", ...],
  "warmth": 0.0-1.0,
  "contrast": 0.0-1.0,
  "saturation": 0.0-1.0,
  "texture": "short description of surface and grain",
  "css_filters": {
    "brightness": number,
    "contrast": number,
    "saturate": number,
    "hue-rotate": "Ndeg",
    "sepia": number
  },
  "sonic_mood": "music that would fit: tempo, instruments, genre, feel"
}

Give 3 to 8 colours as hex values, most dominant first.
Give 3 to 6 mood tags and 3 to 6 aesthetic tags.
Use realistic CSS filter values."##;

/// [`VibeExtractor`] backed by the Claude HTTP API.
#[derive(Clone)]
pub struct ClaudeVibeExtractor {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeVibeExtractor {
    /// Creates an extractor with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = ExtractorConfig::default();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: defaults.model,
            max_tokens: defaults.max_tokens,
        }
    }

    /// Builds an extractor from configuration, reading the API key from the
    /// environment variable the configuration names.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            PatinaError::config(format!(
                "{} is not set; the vibe extractor needs an Anthropic API key",
                config.api_key_env
            ))
        })?;

        Ok(Self::new(api_key)
            .with_model(config.model.clone())
            .with_max_tokens(config.max_tokens))
    }

    /// Uses `ANTHROPIC_API_KEY` and the default model.
    pub fn try_from_env() -> Result<Self> {
        Self::from_config(&ExtractorConfig::default())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &CreateMessageRequest) -> Result<String> {
        let response = self
            .client
            .post(BASE_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                let message = format!("Claude API request failed: {err}");
                if err.is_connect() || err.is_timeout() {
                    PatinaError::retryable_extraction(message)
                } else {
                    PatinaError::extraction(message)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Claude error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: CreateMessageResponse = response.json().await.map_err(|err| {
            PatinaError::extraction(format!("Failed to parse Claude response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl VibeExtractor for ClaudeVibeExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<VibeContribution> {
        let request_body = CreateMessageRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: build_content(request)?,
            }],
        };

        tracing::debug!(
            item_id = %request.item_id,
            model = %self.model,
            "Sending vibe extraction request"
        );
        let reply = self.send_request(&request_body).await?;
        parse_contribution(&reply)
    }
}

/// Builds the user message blocks for one item.
fn build_content(request: &ExtractionRequest) -> Result<Vec<ContentBlock>> {
    let mut blocks = Vec::new();

    let prompt = match request.kind {
        ContributingKind::Image => {
            blocks.push(ContentBlock::Image {
                source: image_source(&request.content)?,
            });
            "Analyze this image as a creative reference and extract its vibe.".to_string()
        }
        ContributingKind::Text => format!(
            "Analyze this text as a creative reference and extract its vibe. The text:\n\n{}",
            request.content
        ),
        ContributingKind::Url => format!(
            "Analyze the web page at this address as a creative reference and extract \
             the vibe its name, domain and likely content suggest:\n\n{}",
            request.content
        ),
    };

    blocks.push(ContentBlock::Text { text: prompt });
    blocks.push(ContentBlock::Text {
        text: RESPONSE_FORMAT.to_string(),
    });
    Ok(blocks)
}

/// Remote images are passed by URL; inline `data:` images are sent as
/// base64 after checking the payload decodes.
fn image_source(content: &str) -> Result<ImageSource> {
    let Some(data_uri) = content.strip_prefix("data:") else {
        return Ok(ImageSource::Url {
            url: content.to_string(),
        });
    };

    let (header, data) = data_uri
        .split_once(',')
        .ok_or_else(|| PatinaError::extraction("Malformed data URI: missing ','"))?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| PatinaError::extraction("Only base64 data URIs are supported"))?;
    if !media_type.starts_with("image/") {
        return Err(PatinaError::extraction(format!(
            "Unsupported media type for image item: {media_type}"
        )));
    }
    BASE64_STANDARD
        .decode(data)
        .map_err(|err| PatinaError::extraction(format!("Invalid base64 image data: {err}")))?;

    Ok(ImageSource::Base64 {
        media_type: media_type.to_string(),
        data: data.to_string(),
    })
}

#[derive(Serialize)]
struct CreateMessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, PartialEq)]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

impl Serialize for ContentBlock {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;

        match self {
            ContentBlock::Text { text } => {
                map.serialize_entry("type", "text")?;
                map.serialize_entry("text", text)?;
            }
            ContentBlock::Image { source } => {
                map.serialize_entry("type", "image")?;
                map.serialize_entry("source", source)?;
            }
        }

        map.end()
    }
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ImageSource {
    Url { url: String },
    Base64 { media_type: String, data: String },
}

#[derive(Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlockResponse {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: CreateMessageResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlockResponse::Text { text } => Some(text),
            ContentBlockResponse::Other => None,
        })
        .ok_or_else(|| PatinaError::extraction("Claude API returned no text in the response"))
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> PatinaError {
    let detail = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    let mut message = format!("Claude API returned {}: {detail}", status.as_u16());
    if let Some(delay) = retry_after {
        message.push_str(&format!(" (retry after {}s)", delay.as_secs()));
    }

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        PatinaError::retryable_extraction(message)
    } else {
        PatinaError::extraction(message)
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let seconds = header?.to_str().ok()?.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds))
}
