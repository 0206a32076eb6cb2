//! File-to-payload encoding.

use crate::error::Result;
use crate::image::types::{InlineImage, SelectedImage};
use base64::Engine;
use std::path::Path;

/// Encodes a selected image as standard base64, passing its media type through.
pub fn encode(image: &SelectedImage) -> InlineImage {
    InlineImage {
        mime_type: image.media_type().to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(image.data()),
    }
}

/// Reads a file and encodes it. Fails with [`TryOnError::Io`] when unreadable.
///
/// [`TryOnError::Io`]: crate::TryOnError::Io
pub fn encode_file(path: impl AsRef<Path>) -> Result<InlineImage> {
    let image = SelectedImage::from_path(path)?;
    Ok(encode(&image))
}
