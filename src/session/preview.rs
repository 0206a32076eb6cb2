//! Preview handles for selected images.
//!
//! A handle is a private temporary file holding the selected bytes; its path
//! is what the view shows. The handle is released when the slot is replaced
//! or cleared.

use crate::error::Result;
use crate::image::{ImageFormat, SelectedImage};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A live preview reference for one selected image.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    /// Writes the image to a fresh temporary file.
    pub fn acquire(image: &SelectedImage) -> Result<Self> {
        let suffix = ImageFormat::from_mime_type(image.media_type())
            .map(|f| format!(".{}", f.extension()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("tryon-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(image.data())?;
        file.flush()?;

        tracing::debug!(path = %file.path().display(), "acquired preview");
        Ok(Self { file })
    }

    /// Location of the preview file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Deletes the preview file.
    pub fn release(self) -> Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        tracing::debug!(path = %path.display(), "released preview");
        Ok(())
    }
}
