//! Gemini (Google) try-on provider.

use crate::error::{sanitize_error_message, Result, TryOnError};
use crate::image::encoder::encode;
use crate::image::provider::{ProviderKind, TryOnProvider, TryOnRequest};
use crate::image::types::{ImageDataUri, InlineImage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Default Generative Language API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Nano Banana - Gemini 2.5 Flash Image (fast, economical).
    #[default]
    NanoBanana,
    /// Nano Banana Pro - Gemini 3 Pro Image (highest quality).
    NanoBananaPro,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NanoBanana => "gemini-2.5-flash-image",
            Self::NanoBananaPro => "nano-banana-pro-preview",
        }
    }
}

/// Builder for GeminiProvider.
#[derive(Debug, Clone)]
pub struct GeminiProviderBuilder {
    api_key: Option<String>,
    api_key_env: String,
    model: GeminiModel,
    base_url: String,
}

impl Default for GeminiProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            model: GeminiModel::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GeminiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key explicitly. Without it, the key is read from the
    /// environment on every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the environment variable the key is read from (default `API_KEY`).
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = name.into();
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Overrides the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builds the provider. The credential is not checked here.
    pub fn build(self) -> Result<GeminiProvider> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TryOnError::InvalidRequest("base URL must not be empty".into()));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(TryOnError::InvalidRequest(
                "API key environment variable name must not be empty".into(),
            ));
        }

        Ok(GeminiProvider {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            api_key_env: self.api_key_env,
            model: self.model,
            base_url,
        })
    }
}

/// Gemini try-on provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    api_key_env: String,
    model: GeminiModel,
    base_url: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProviderBuilder`.
    pub fn builder() -> GeminiProviderBuilder {
        GeminiProviderBuilder::new()
    }

    /// Model this provider talks to.
    pub fn model(&self) -> GeminiModel {
        self.model
    }

    fn resolve_api_key(&self) -> Result<String> {
        if let Some(ref key) = self.api_key {
            return Ok(key.clone());
        }
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(TryOnError::Config(format!(
                "API key is not configured (set {})",
                self.api_key_env
            ))),
        }
    }

    async fn generate_impl(&self, request: &TryOnRequest) -> Result<ImageDataUri> {
        let api_key = self.resolve_api_key()?;
        let start = Instant::now();

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            self.model.as_str(),
        );

        let body = GeminiRequest::from_try_on_request(request);

        tracing::debug!(
            model = self.model.as_str(),
            person_bytes = request.person.size(),
            outfit_bytes = request.outfit.size(),
            "submitting Gemini try-on request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TryOnError::Api {
                status: status.as_u16(),
                message: sanitize_error_message(&text),
            });
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let image = gemini_response.into_first_image()?;

        tracing::debug!(
            mime_type = image.mime_type(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Gemini try-on generation complete"
        );

        Ok(image)
    }
}

#[async_trait]
impl TryOnProvider for GeminiProvider {
    async fn generate(&self, request: &TryOnRequest) -> Result<ImageDataUri> {
        self.generate_impl(request).await
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - can be text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineImage,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn from_try_on_request(req: &TryOnRequest) -> Self {
        // Person first, outfit second: the prompt refers to them in that order.
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: encode(&req.person),
            },
            GeminiRequestPart::InlineData {
                inline_data: encode(&req.outfit),
            },
            GeminiRequestPart::Text {
                text: req.prompt.clone(),
            },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineImage>,
}

impl GeminiResponse {
    /// First inline image of the first candidate; later images and text are dropped.
    fn into_first_image(self) -> Result<ImageDataUri> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(TryOnError::NoImage {
                finish_reason: None,
            });
        };

        let finish_reason = candidate.finish_reason;
        candidate
            .content
            .into_iter()
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data)
            .map(|inline| ImageDataUri::new(inline.mime_type, inline.data))
            .ok_or(TryOnError::NoImage { finish_reason })
    }
}
