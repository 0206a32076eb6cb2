//! Core types for try-on images.

use crate::error::{Result, TryOnError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Media type used when a file's type can be neither declared nor detected.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Maps a MIME type back to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// A local image chosen by the user, with its declared media type.
///
/// The byte buffer is shared, so cloning a selection into a request is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    data: Arc<[u8]>,
    media_type: String,
    name: Option<String>,
}

impl SelectedImage {
    /// Creates a selection from raw bytes and a declared media type.
    pub fn new(data: impl Into<Arc<[u8]>>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
            name: None,
        }
    }

    /// Sets a display name (usually the file name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Reads a file from disk.
    ///
    /// The media type comes from the file extension; unknown extensions fall
    /// back to magic-byte detection, then to `application/octet-stream`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;

        let media_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .or_else(|| ImageFormat::from_magic_bytes(&data))
            .map(|f| f.mime_type())
            .unwrap_or(OCTET_STREAM);

        let mut image = Self::new(data, media_type);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            image = image.with_name(name);
        }
        Ok(image)
    }

    /// Raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Declared media type, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Display name, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Size of the blob in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// An image encoded for transport: base64 text plus its media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    /// Media type passed through from the source.
    pub mime_type: String,
    /// Standard (padded) base64 of the bytes.
    pub data: String,
}

/// A generated image as a self-describing data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "generated image should be saved or displayed"]
pub struct ImageDataUri {
    mime_type: String,
    data: String,
}

impl ImageDataUri {
    /// Creates a data URI from a media type and base64 payload, both verbatim.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Media type of the image.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload as returned by the API.
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    /// Image format, when the media type is a known one.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.mime_type)
    }

    /// Decodes the payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|e| TryOnError::Decode(e.to_string()))
    }

    /// Decodes the payload and writes it to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let bytes = self.decode()?;
        std::fs::write(path, &bytes)?;
        Ok(bytes.len())
    }
}

impl fmt::Display for ImageDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"short"), None);
    }

    #[test]
    fn test_format_from_extension_and_mime() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("gif"), None);
        assert_eq!(
            ImageFormat::from_mime_type("image/webp"),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_mime_type("text/plain"), None);
    }

    #[test]
    fn test_selected_image_from_path_uses_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.jpg");
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let image = SelectedImage::from_path(&path).unwrap();
        // The extension is the declared type, even if the bytes disagree.
        assert_eq!(image.media_type(), "image/jpeg");
        assert_eq!(image.name(), Some("me.jpg"));
        assert_eq!(image.size(), 12);
    }

    #[test]
    fn test_selected_image_from_path_sniffs_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let sniffed = dir.path().join("look.bin");
        std::fs::write(&sniffed, WEBP_MAGIC).unwrap();
        assert_eq!(
            SelectedImage::from_path(&sniffed).unwrap().media_type(),
            "image/webp"
        );

        let opaque = dir.path().join("notes");
        std::fs::write(&opaque, b"plain text, not an image").unwrap();
        assert_eq!(
            SelectedImage::from_path(&opaque).unwrap().media_type(),
            OCTET_STREAM
        );
    }

    #[test]
    fn test_selected_image_missing_file_is_io_error() {
        let err = SelectedImage::from_path("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TryOnError::Io(_)));
    }

    #[test]
    fn test_data_uri_display_is_verbatim() {
        let uri = ImageDataUri::new("image/png", "Zm9v");
        assert_eq!(uri.to_string(), "data:image/png;base64,Zm9v");
        assert_eq!(uri.format(), Some(ImageFormat::Png));
    }

    #[test]
    fn test_data_uri_save_decodes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let written = ImageDataUri::new("image/png", "Zm9v").save(&path).unwrap();
        assert_eq!(written, 3);
        assert_eq!(std::fs::read(&path).unwrap(), b"foo");
    }

    #[test]
    fn test_data_uri_invalid_payload_is_decode_error() {
        let err = ImageDataUri::new("image/png", "not base64!").decode().unwrap_err();
        assert!(matches!(err, TryOnError::Decode(_)));
    }
}
