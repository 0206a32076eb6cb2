//! Try-on provider trait and request type.

use crate::error::Result;
use crate::image::types::{ImageDataUri, SelectedImage};
use crate::prompt::build_prompt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Try-on provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini image models.
    Gemini,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// One generation attempt: the two reference images and the instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnRequest {
    /// Face and body reference.
    pub person: SelectedImage,
    /// Outfit reference.
    pub outfit: SelectedImage,
    /// Instruction text sent after the images.
    pub prompt: String,
}

impl TryOnRequest {
    /// Creates a request whose prompt is built from the user's details.
    pub fn new(person: SelectedImage, outfit: SelectedImage, details: &str) -> Self {
        Self::with_prompt(person, outfit, build_prompt(details))
    }

    /// Creates a request with an already-built prompt.
    pub fn with_prompt(
        person: SelectedImage,
        outfit: SelectedImage,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            person,
            outfit,
            prompt: prompt.into(),
        }
    }
}

/// Trait for try-on generation backends.
#[async_trait]
pub trait TryOnProvider: Send + Sync {
    /// Issues exactly one generation request and returns the first image.
    async fn generate(&self, request: &TryOnRequest) -> Result<ImageDataUri>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            ProviderKind::Gemini => "Gemini (Google)",
        }
    }
}
