//! Stateless upload widget and the capability it drives.

use crate::image::SelectedImage;
use crate::session::state::Slot;
use std::path::Path;

/// Media types offered by the file picker. Shown as a hint, never enforced.
pub const ACCEPTED_MEDIA_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// What an upload widget may ask of its owner.
pub trait UploadTarget {
    /// A file was chosen.
    fn on_file_selected(&mut self, image: SelectedImage);

    /// The user asked to clear the current file.
    fn on_clear_requested(&mut self);
}

/// A drop target for a single image. Holds labels only; the owner keeps the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploader {
    id: String,
    title: String,
    description: String,
}

impl Uploader {
    /// Creates a widget with its labels.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// The standard widget for one of the session's slots.
    pub fn for_slot(slot: Slot) -> Self {
        match slot {
            Slot::Person => Self::new("person", "1. Person photo", "Face and body for reference."),
            Slot::Outfit => Self::new("outfit", "2. Outfit photo", "Clothes, style and accessories."),
        }
    }

    /// Widget identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Hands the first selected file to `target`. Extra files are ignored.
    pub fn select<T>(&self, files: impl IntoIterator<Item = SelectedImage>, target: &mut T)
    where
        T: UploadTarget + ?Sized,
    {
        if let Some(first) = files.into_iter().next() {
            target.on_file_selected(first);
        }
    }

    /// Forwards the clear action.
    pub fn clear<T>(&self, target: &mut T)
    where
        T: UploadTarget + ?Sized,
    {
        target.on_clear_requested();
    }

    /// Renders the widget with the owner's preview, or a placeholder.
    pub fn render(&self, preview: Option<&Path>) -> String {
        match preview {
            Some(path) => format!(
                "{}\n  [preview] {}\n  (clear {} to remove)",
                self.title,
                path.display(),
                self.id
            ),
            None => format!(
                "{}\n  Click to upload: {}\n  Accepts {}",
                self.title,
                self.description,
                ACCEPTED_MEDIA_TYPES.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        selected: Vec<String>,
        clears: usize,
    }

    impl UploadTarget for Recorder {
        fn on_file_selected(&mut self, image: SelectedImage) {
            self.selected
                .push(String::from_utf8_lossy(image.data()).into_owned());
        }

        fn on_clear_requested(&mut self) {
            self.clears += 1;
        }
    }

    fn file(tag: &str) -> SelectedImage {
        SelectedImage::new(tag.as_bytes().to_vec(), "image/png")
    }

    fn widget() -> Uploader {
        Uploader::new("person", "1. Person photo", "Face and body for reference.")
    }

    #[test]
    fn test_select_forwards_only_first_file() {
        let mut target = Recorder::default();
        widget().select(vec![file("a"), file("b"), file("c")], &mut target);
        assert_eq!(target.selected, vec!["a"]);
    }

    #[test]
    fn test_empty_selection_is_ignored() {
        let mut target = Recorder::default();
        widget().select(Vec::new(), &mut target);
        assert!(target.selected.is_empty());
    }

    #[test]
    fn test_clear_invokes_callback() {
        let mut target = Recorder::default();
        let uploader = widget();
        uploader.clear(&mut target);
        uploader.clear(&mut target);
        assert_eq!(target.clears, 2);
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut recorder = Recorder::default();
        let target: &mut dyn UploadTarget = &mut recorder;
        widget().select(vec![file("z")], target);
        assert_eq!(recorder.selected, vec!["z"]);
    }

    #[test]
    fn test_slot_widgets_use_slot_ids() {
        for slot in Slot::ALL {
            assert_eq!(Uploader::for_slot(slot).id(), slot.as_str());
        }
    }

    #[test]
    fn test_render_placeholder_and_preview() {
        let uploader = widget();
        let empty = uploader.render(None);
        assert!(empty.contains("Click to upload"));
        assert!(empty.contains("image/png, image/jpeg, image/webp"));

        let shown = uploader.render(Some(Path::new("/tmp/tryon-preview-x.png")));
        assert!(shown.contains("/tmp/tryon-preview-x.png"));
        assert!(!shown.contains("Click to upload"));
    }
}
