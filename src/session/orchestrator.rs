//! The try-on form as an explicit state machine.

use crate::error::TryOnError;
use crate::image::{SelectedImage, TryOnProvider, TryOnRequest};
use crate::session::preview::PreviewHandle;
use crate::session::state::{Event, Slot, UiState};
use crate::session::uploader::UploadTarget;
use std::path::Path;

/// Shown when generation is triggered without both images.
pub const VALIDATION_MESSAGE: &str = "Please upload both the person image and the outfit image.";

/// Shown when a failure carries no descriptive text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Turns a generation error into the text shown to the user.
pub fn failure_message(error: &TryOnError) -> String {
    let text = error.to_string();
    if text.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        format!("Failed to generate image: {text}")
    }
}

#[derive(Debug)]
struct Selection {
    image: SelectedImage,
    preview: Option<PreviewHandle>,
}

impl Selection {
    fn new(image: SelectedImage) -> Self {
        let preview = match PreviewHandle::acquire(&image) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("could not create preview: {e}");
                None
            }
        };
        Self { image, preview }
    }

    fn release(self) {
        if let Some(preview) = self.preview {
            if let Err(e) = preview.release() {
                tracing::warn!("could not release preview: {e}");
            }
        }
    }
}

/// Owns the two image slots, the details text and the visible state.
#[derive(Debug, Default)]
pub struct TryOnSession {
    person: Option<Selection>,
    outfit: Option<Selection>,
    details: String,
    state: UiState,
}

impl TryOnSession {
    /// Creates an empty session in the `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current visible state.
    pub fn current_state(&self) -> &UiState {
        &self.state
    }

    /// Current details text.
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Image held by a slot.
    pub fn image(&self, slot: Slot) -> Option<&SelectedImage> {
        self.selection(slot).map(|s| &s.image)
    }

    /// Preview reference for a slot, when one could be created.
    pub fn preview(&self, slot: Slot) -> Option<&Path> {
        self.selection(slot)
            .and_then(|s| s.preview.as_ref())
            .map(PreviewHandle::path)
    }

    /// Whether the submit control is usable: both images present, nothing in flight.
    pub fn is_submit_enabled(&self) -> bool {
        self.person.is_some() && self.outfit.is_some() && !self.state.is_loading()
    }

    /// Binds a slot to the upload capability so a widget can drive it.
    pub fn slot(&mut self, slot: Slot) -> SlotBinding<'_> {
        SlotBinding {
            session: self,
            slot,
        }
    }

    /// Applies one event.
    ///
    /// Returns the request to execute when `GenerateRequested` is accepted; the
    /// caller reports its outcome with `GenerationFinished`.
    pub fn dispatch(&mut self, event: Event) -> Option<TryOnRequest> {
        match event {
            Event::FileSelected(slot, image) => {
                let previous = self.selection_mut(slot).replace(Selection::new(image));
                if let Some(previous) = previous {
                    previous.release();
                }
                None
            }
            Event::ClearRequested(slot) => {
                if let Some(previous) = self.selection_mut(slot).take() {
                    previous.release();
                }
                None
            }
            Event::DetailsChanged(details) => {
                self.details = details;
                None
            }
            Event::GenerateRequested => self.begin_generation(),
            Event::GenerationFinished(outcome) => {
                self.finish_generation(outcome);
                None
            }
        }
    }

    /// Triggers generation and drives it to completion with `provider`.
    pub async fn generate<P>(&mut self, provider: &P) -> &UiState
    where
        P: TryOnProvider + ?Sized,
    {
        let Some(request) = self.dispatch(Event::GenerateRequested) else {
            return &self.state;
        };

        let outcome = provider
            .generate(&request)
            .await
            .map_err(|e| failure_message(&e));
        self.dispatch(Event::GenerationFinished(outcome));
        &self.state
    }

    fn begin_generation(&mut self) -> Option<TryOnRequest> {
        if self.state.is_loading() {
            tracing::debug!("generation already in flight, ignoring trigger");
            return None;
        }

        let (Some(person), Some(outfit)) = (&self.person, &self.outfit) else {
            self.state = UiState::Failed(VALIDATION_MESSAGE.to_string());
            return None;
        };

        let request = TryOnRequest::new(person.image.clone(), outfit.image.clone(), &self.details);
        self.state = UiState::Loading;
        tracing::info!("generation started");
        Some(request)
    }

    fn finish_generation(&mut self, outcome: Result<crate::image::ImageDataUri, String>) {
        if !self.state.is_loading() {
            tracing::debug!("no generation in flight, ignoring result");
            return;
        }

        self.state = match outcome {
            Ok(image) => {
                tracing::info!(mime_type = image.mime_type(), "generation succeeded");
                UiState::Success(image)
            }
            Err(message) => {
                tracing::info!(%message, "generation failed");
                let message = if message.trim().is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    message
                };
                UiState::Failed(message)
            }
        };
    }

    fn selection(&self, slot: Slot) -> Option<&Selection> {
        match slot {
            Slot::Person => self.person.as_ref(),
            Slot::Outfit => self.outfit.as_ref(),
        }
    }

    fn selection_mut(&mut self, slot: Slot) -> &mut Option<Selection> {
        match slot {
            Slot::Person => &mut self.person,
            Slot::Outfit => &mut self.outfit,
        }
    }
}

/// A session slot seen through the upload capability.
pub struct SlotBinding<'a> {
    session: &'a mut TryOnSession,
    slot: Slot,
}

impl UploadTarget for SlotBinding<'_> {
    fn on_file_selected(&mut self, image: SelectedImage) {
        self.session.dispatch(Event::FileSelected(self.slot, image));
    }

    fn on_clear_requested(&mut self) {
        self.session.dispatch(Event::ClearRequested(self.slot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageDataUri, ProviderKind};
    use crate::session::uploader::Uploader;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn image(tag: &str) -> SelectedImage {
        SelectedImage::new(tag.as_bytes().to_vec(), "image/png")
    }

    fn ready_session() -> TryOnSession {
        let mut session = TryOnSession::new();
        session.dispatch(Event::FileSelected(Slot::Person, image("person")));
        session.dispatch(Event::FileSelected(Slot::Outfit, image("outfit")));
        session
    }

    struct ScriptedProvider {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl ScriptedProvider {
        fn new(fail_first: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first,
            }
        }
    }

    #[async_trait]
    impl TryOnProvider for ScriptedProvider {
        async fn generate(&self, _request: &TryOnRequest) -> crate::Result<ImageDataUri> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                return Err(TryOnError::Api {
                    status: 500,
                    message: "backend exploded".into(),
                });
            }
            Ok(ImageDataUri::new("image/png", "Zm9v"))
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::Gemini
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = TryOnSession::new();
        assert_eq!(session.current_state(), &UiState::Idle);
        assert!(!session.is_submit_enabled());
        assert_eq!(session.details(), "");
    }

    #[test]
    fn test_trigger_without_images_sets_validation_error() {
        let mut session = TryOnSession::new();
        session.dispatch(Event::FileSelected(Slot::Person, image("person")));

        assert!(session.dispatch(Event::GenerateRequested).is_none());
        assert_eq!(
            session.current_state(),
            &UiState::Failed(VALIDATION_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_generate_without_images_never_calls_provider() {
        let provider = ScriptedProvider::new(false);
        let mut session = TryOnSession::new();
        session.dispatch(Event::FileSelected(Slot::Outfit, image("outfit")));

        let state = session.generate(&provider).await;
        assert_eq!(state.error(), Some(VALIDATION_MESSAGE));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_trigger_builds_request_and_enters_loading() {
        let mut session = ready_session();
        session.dispatch(Event::DetailsChanged("red scarf".into()));

        let request = session.dispatch(Event::GenerateRequested).unwrap();
        assert_eq!(request.person.data(), b"person");
        assert_eq!(request.outfit.data(), b"outfit");
        assert!(request.prompt.contains("red scarf"));
        assert!(session.current_state().is_loading());
        assert!(!session.is_submit_enabled());
    }

    #[test]
    fn test_retrigger_while_loading_is_noop() {
        let mut session = ready_session();
        assert!(session.dispatch(Event::GenerateRequested).is_some());
        assert!(session.dispatch(Event::GenerateRequested).is_none());
        assert!(session.current_state().is_loading());

        session.dispatch(Event::GenerationFinished(Ok(ImageDataUri::new(
            "image/png",
            "Zm9v",
        ))));
        assert!(session.dispatch(Event::GenerateRequested).is_some());
    }

    #[test]
    fn test_finish_without_request_is_ignored() {
        let mut session = ready_session();
        session.dispatch(Event::GenerationFinished(Err("late".into())));
        assert_eq!(session.current_state(), &UiState::Idle);
    }

    #[test]
    fn test_empty_failure_text_uses_fallback() {
        let mut session = ready_session();
        session.dispatch(Event::GenerateRequested);
        session.dispatch(Event::GenerationFinished(Err("  ".into())));
        assert_eq!(session.current_state().error(), Some(UNKNOWN_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_failure_then_success_leaves_only_result() {
        let provider = ScriptedProvider::new(true);
        let mut session = ready_session();

        let state = session.generate(&provider).await.clone();
        assert_eq!(
            state.error(),
            Some("Failed to generate image: API error: 500 - backend exploded")
        );

        let state = session.generate(&provider).await;
        assert_eq!(
            state,
            &UiState::Success(ImageDataUri::new("image/png", "Zm9v"))
        );
        assert!(state.error().is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_replacing_image_releases_previous_preview() {
        let mut session = TryOnSession::new();
        session.dispatch(Event::FileSelected(Slot::Person, image("first")));
        let first = session.preview(Slot::Person).unwrap().to_path_buf();
        assert!(first.exists());

        session.dispatch(Event::FileSelected(Slot::Person, image("second")));
        let second = session.preview(Slot::Person).unwrap().to_path_buf();
        assert!(!first.exists());
        assert_eq!(std::fs::read(&second).unwrap(), b"second");
        assert_eq!(session.image(Slot::Person).unwrap().data(), b"second");
    }

    #[test]
    fn test_clear_releases_preview_and_empties_slot() {
        let mut session = ready_session();
        let path = session.preview(Slot::Outfit).unwrap().to_path_buf();

        session.dispatch(Event::ClearRequested(Slot::Outfit));
        assert!(!path.exists());
        assert!(session.image(Slot::Outfit).is_none());
        assert!(session.image(Slot::Person).is_some());
        assert!(!session.is_submit_enabled());

        // Clearing an empty slot is harmless.
        session.dispatch(Event::ClearRequested(Slot::Outfit));
    }

    #[test]
    fn test_uploader_drives_session_through_slot_binding() {
        let mut session = TryOnSession::new();
        let uploader = Uploader::for_slot(Slot::Person);

        uploader.select(vec![image("a"), image("b")], &mut session.slot(Slot::Person));
        assert_eq!(session.image(Slot::Person).unwrap().data(), b"a");
        assert!(session.image(Slot::Outfit).is_none());

        uploader.clear(&mut session.slot(Slot::Person));
        assert!(session.image(Slot::Person).is_none());
    }

    #[test]
    fn test_failure_message_wraps_error_text() {
        let err = TryOnError::NoImage {
            finish_reason: None,
        };
        assert_eq!(
            failure_message(&err),
            "Failed to generate image: no image produced"
        );
    }
}
