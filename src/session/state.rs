//! Session states and the events that drive them.

use crate::image::{ImageDataUri, SelectedImage};

/// One of the two image slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Face and body reference.
    Person,
    /// Outfit reference.
    Outfit,
}

impl Slot {
    /// Both slots in display order.
    pub const ALL: [Slot; 2] = [Slot::Person, Slot::Outfit];

    /// Short lowercase name, as typed in the console.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Outfit => "outfit",
        }
    }

    /// Parses a console slot name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "person" => Some(Self::Person),
            "outfit" | "look" => Some(Self::Outfit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visible state of the result area. Exactly one holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    /// No attempt yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last attempt produced an image.
    Success(ImageDataUri),
    /// The last attempt failed, or the trigger was rejected.
    Failed(String),
}

impl UiState {
    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Generated image, if the last attempt succeeded.
    pub fn result(&self) -> Option<&ImageDataUri> {
        match self {
            Self::Success(image) => Some(image),
            _ => None,
        }
    }

    /// Failure message, if the last attempt failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Inputs to the session state machine.
#[derive(Debug, Clone)]
pub enum Event {
    /// A file was picked for a slot.
    FileSelected(Slot, SelectedImage),
    /// The slot's clear action was used.
    ClearRequested(Slot),
    /// The details text changed.
    DetailsChanged(String),
    /// The submit control was used.
    GenerateRequested,
    /// The in-flight request settled.
    GenerationFinished(Result<ImageDataUri, String>),
}
