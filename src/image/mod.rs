//! Image payloads and the remote generation client.

pub mod encoder;
mod provider;
pub mod providers;
mod types;

pub use encoder::{encode, encode_file};
pub use provider::{ProviderKind, TryOnProvider, TryOnRequest};
pub use types::{ImageDataUri, ImageFormat, InlineImage, SelectedImage, OCTET_STREAM};
