#![warn(missing_docs)]
//! tryon - virtual try-on with Gemini image generation.
//!
//! Pick a person photo and an outfit photo, optionally describe extra
//! details, and ask the model for a picture of that person wearing the outfit.
//!
//! # Quick Start
//!
//! ```no_run
//! use tryon::{Event, GeminiProvider, SelectedImage, Slot, TryOnSession, UiState};
//!
//! #[tokio::main]
//! async fn main() -> tryon::Result<()> {
//!     // Reads API_KEY from the environment when the request is made.
//!     let provider = GeminiProvider::builder().build()?;
//!
//!     let mut session = TryOnSession::new();
//!     session.dispatch(Event::FileSelected(Slot::Person, SelectedImage::from_path("me.jpg")?));
//!     session.dispatch(Event::FileSelected(Slot::Outfit, SelectedImage::from_path("look.png")?));
//!     session.dispatch(Event::DetailsChanged("with sunglasses".into()));
//!
//!     if let UiState::Success(image) = session.generate(&provider).await {
//!         image.save("result.png")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Layout
//!
//! - [`image`]: encoding, request types and the Gemini client
//! - [`prompt`]: the instruction text
//! - [`session`]: the form state machine, upload widgets and text rendering
//! - [`console`]: an interactive front end over stdin/stdout

pub mod console;
mod error;
pub mod image;
pub mod prompt;
pub mod session;

// Re-export error types at crate root
pub use error::{Result, TryOnError};

pub use image::providers::{GeminiModel, GeminiProvider, GeminiProviderBuilder};
pub use image::{
    ImageDataUri, ImageFormat, InlineImage, ProviderKind, SelectedImage, TryOnProvider,
    TryOnRequest,
};
pub use prompt::build_prompt;
pub use session::{Event, Slot, TryOnSession, UiState};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, TryOnError};
    pub use crate::image::providers::GeminiProvider;
    pub use crate::image::{ImageDataUri, SelectedImage, TryOnProvider, TryOnRequest};
    pub use crate::session::{Event, Slot, TryOnSession, UiState, UploadTarget, Uploader};
}
