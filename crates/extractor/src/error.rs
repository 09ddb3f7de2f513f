// ABOUTME: Error types for rendering backends and profile-table loading.
// ABOUTME: Provides RenderError and ProfileError with convenience constructors.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by rendering backends.
///
/// These are transport-level failures: the orchestrator retries them and
/// converts exhaustion into a sentinel result, so they never cross the
/// library boundary as `Err`.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A session could not be created (browser launch, page allocation,
    /// HTTP client construction).
    #[error("failed to create rendering session: {0}")]
    Session(#[source] anyhow::Error),

    /// Navigation to the target URL failed.
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// The page did not finish loading within the timeout.
    #[error("page load timed out after {0:?}")]
    Timeout(Duration),

    /// The backend misbehaved mid-session (protocol error, crash).
    #[error("rendering backend error: {0}")]
    Backend(#[source] anyhow::Error),
}

impl RenderError {
    /// Creates a Session error from any underlying error.
    pub fn session(err: impl Into<anyhow::Error>) -> Self {
        RenderError::Session(err.into())
    }

    /// Creates a Navigation error for `url` from any underlying error.
    pub fn navigation(url: impl Into<String>, err: impl Into<anyhow::Error>) -> Self {
        RenderError::Navigation {
            url: url.into(),
            source: err.into(),
        }
    }

    /// Creates a Backend error from any underlying error.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        RenderError::Backend(err.into())
    }

    /// True for page-load timeouts, the most common flaky-page signal.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RenderError::Timeout(_))
    }
}

/// Errors raised while loading a profile table.
///
/// Both variants indicate a broken build or bad deploy data, not bad user
/// input; they are startup-fatal.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile JSON failed to deserialize.
    #[error("failed to parse profile table: {0}")]
    Parse(String),

    /// The table contains no `default` entry.
    #[error("profile table has no default entry")]
    MissingDefault,
}

impl ProfileError {
    /// Creates a Parse error from an underlying serde error.
    pub fn parse(err: impl fmt::Display) -> Self {
        ProfileError::Parse(err.to_string())
    }
}
