//! Text rendering of a session. Pure: reads state, writes nothing.

use crate::session::orchestrator::TryOnSession;
use crate::session::state::{Slot, UiState};
use crate::session::uploader::Uploader;
use std::fmt::Write;

const TITLE: &str = "Virtual Try-On";
const SUBMIT_LABEL: &str = "Generate image";
const SUBMIT_BUSY_LABEL: &str = "Generating...";

/// Renders the whole form: both uploaders, details, submit control, result area.
pub fn render(session: &TryOnSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {TITLE} ===");

    for slot in Slot::ALL {
        let _ = writeln!(
            out,
            "{}",
            Uploader::for_slot(slot).render(session.preview(slot))
        );
    }

    let details = if session.details().is_empty() {
        "(none)"
    } else {
        session.details()
    };
    let _ = writeln!(out, "Details: {details}");

    let label = if session.current_state().is_loading() {
        SUBMIT_BUSY_LABEL
    } else {
        SUBMIT_LABEL
    };
    let marker = if session.is_submit_enabled() {
        ""
    } else {
        " (disabled)"
    };
    let _ = writeln!(out, "[{label}]{marker}");

    out.push_str(&render_result(session.current_state()));
    out
}

/// Renders the result area. Spinner, error, result and hint are exclusive.
pub fn render_result(state: &UiState) -> String {
    match state {
        UiState::Loading => "... generating, please wait\n".to_string(),
        UiState::Failed(message) => format!("Oops!\n{message}\n"),
        UiState::Success(image) => format!(
            "Result: {} image ({} base64 chars)\n",
            image.mime_type(),
            image.base64_data().len()
        ),
        UiState::Idle => {
            "Your image will appear here.\nSet up the options and choose \"Generate image\".\n"
                .to_string()
        }
    }
}
