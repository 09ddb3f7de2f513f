// ABOUTME: Extraction result type and its sentinel constructors.
// ABOUTME: Title/body pairs plus the orchestrator's in-band failure shapes.

//! Extraction results.
//!
//! Results are always well-formed `(title, body)` pairs; failure travels
//! in-band as sentinel strings so callers see one shape on every path.

use serde::{Deserialize, Serialize};

/// Sentinel title marking a failed fetch (backend exhaustion or internal
/// error), distinct from the softer "title not found".
pub const ERROR_TITLE: &str = "Error";

/// Extracted article content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Article title, or a sentinel when no locator matched.
    pub title: String,
    /// Article body text, normalized and truncated; never empty.
    pub body: String,
}

impl Extraction {
    /// Result shape for a backend that failed every attempt.
    ///
    /// Downstream consumers match on this exact phrasing; do not reword.
    pub fn backend_failure(attempts: u32, message: impl std::fmt::Display) -> Self {
        Extraction {
            title: ERROR_TITLE.to_string(),
            body: format!(
                "Error de Selenium al procesar la noticia tras {} intentos: {}",
                attempts, message
            ),
        }
    }

    /// Result shape for an unexpected failure outside the retry loop.
    pub fn internal_failure(message: impl std::fmt::Display) -> Self {
        Extraction {
            title: ERROR_TITLE.to_string(),
            body: format!("Error general al procesar la noticia: {}", message),
        }
    }

    /// True when this result is a fetch-failure sentinel rather than
    /// extracted content.
    pub fn is_failure(&self) -> bool {
        self.title == ERROR_TITLE
    }
}
