//! Form state, upload widgets and the text view.

mod orchestrator;
mod preview;
pub mod render;
mod state;
mod uploader;

pub use orchestrator::{
    failure_message, SlotBinding, TryOnSession, UNKNOWN_ERROR_MESSAGE, VALIDATION_MESSAGE,
};
pub use preview::PreviewHandle;
pub use render::render;
pub use state::{Event, Slot, UiState};
pub use uploader::{UploadTarget, Uploader, ACCEPTED_MEDIA_TYPES};
