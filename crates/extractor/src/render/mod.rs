// ABOUTME: Rendering backend abstraction: async sessions that navigate, wait, and capture markup.
// ABOUTME: Backends plug into the orchestrator; HTTP is the default, Chromium is feature-gated.

//! Pluggable page rendering.
//!
//! The orchestrator talks to rendering through two object-safe traits:
//! [`RenderBackend`] opens sessions, [`RenderSession`] drives one page.
//! Each request owns its session exclusively and releases it on every exit
//! path.
//!
//! Shipped implementations:
//! - [`HttpBackend`] (default): one reqwest GET, no script execution.
//! - `ChromiumBackend` (cargo feature `browser`): headless Chromium via
//!   chromiumoxide, for pages that only materialize client-side.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RenderError;

#[cfg(feature = "browser")]
pub mod chromium;
pub mod http;

#[cfg(feature = "browser")]
pub use crate::render::chromium::ChromiumBackend;
pub use crate::render::http::HttpBackend;

/// Default user agent presented to target sites.
///
/// A mobile profile tends to get lighter, less script-gated markup.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/114.0.0.0 Mobile Safari/537.36";

/// Options applied when a backend opens a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// User-agent header sent with every navigation.
    pub user_agent: String,
    /// Run without a visible window. Only meaningful for browser backends.
    pub headless: bool,
    /// Suppress automation-detection signals such as `navigator.webdriver`.
    /// Only meaningful for browser backends.
    pub mask_automation: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headless: true,
            mask_automation: true,
        }
    }
}

impl SessionConfig {
    /// Replaces the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// One exclusive page-rendering session.
///
/// The orchestrator calls these in a fixed order per attempt: `navigate`,
/// optionally `wait_for_selector`, `markup`, `close`. `close` runs on every
/// exit path and must be safe to call after a failed navigation.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigates to `url`, allowing the page load up to `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError>;

    /// Waits up to `timeout` for `selector` to match in the live DOM.
    ///
    /// Returns `Ok(false)` when the wait expires without a match. `Err` is
    /// reserved for backend failures, not missing elements.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, RenderError>;

    /// Captures the current markup of the page.
    async fn markup(&mut self) -> Result<String, RenderError>;

    /// Releases the session and its backing resources. Idempotent.
    async fn close(&mut self) -> Result<(), RenderError>;
}

/// Factory for rendering sessions.
#[async_trait]
pub trait RenderBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Opens a fresh session configured per `config`.
    async fn new_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn RenderSession>, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_session_config_is_headless_and_masked() {
        let config = SessionConfig::default();
        assert!(config.headless);
        assert!(config.mask_automation);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn with_user_agent_overrides_only_the_agent() {
        let config = SessionConfig::default().with_user_agent("bot/1.0");
        assert_eq!(config.user_agent, "bot/1.0");
        assert!(config.headless);
    }
}
