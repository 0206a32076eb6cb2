//! Try-on generation providers.

mod gemini;

pub use gemini::{
    GeminiModel, GeminiProvider, GeminiProviderBuilder, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL,
};
