// ABOUTME: Plain-HTTP rendering backend: one reqwest GET per navigation, no script execution.
// ABOUTME: Default backend for the CLI, the server, and tests against mock servers.

//! Static-fetch rendering.
//!
//! [`HttpBackend`] satisfies the rendering contract with a single GET per
//! navigation. Pages come back exactly as served; `wait_for_selector`
//! inspects the already-captured markup instead of a live DOM, so it never
//! blocks.

use std::time::Duration;

use async_trait::async_trait;
use dom_query::Document;
use reqwest::Client;
use tracing::debug;

use crate::error::RenderError;
use crate::render::{RenderBackend, RenderSession, SessionConfig};
use crate::selector::get_or_compile;

/// Rendering backend that fetches markup with one HTTP GET.
///
/// Suitable for static publishers, tests, and any deployment where running
/// a browser is not worth the cost.
#[derive(Debug, Clone, Default)]
pub struct HttpBackend;

impl HttpBackend {
    pub fn new() -> Self {
        HttpBackend
    }
}

#[async_trait]
impl RenderBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn new_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn RenderSession>, RenderError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(RenderError::session)?;
        Ok(Box::new(HttpSession {
            client,
            markup: None,
        }))
    }
}

/// One GET's worth of state: the client and the last captured body.
struct HttpSession {
    client: Client,
    markup: Option<String>,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| classify(url, timeout, err))?
            .error_for_status()
            .map_err(|err| RenderError::navigation(url, err))?;
        let body = response
            .text()
            .await
            .map_err(|err| RenderError::navigation(url, err))?;
        debug!(url, bytes = body.len(), "fetched markup");
        self.markup = Some(body);
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<bool, RenderError> {
        // There is no live DOM to watch; the answer is already in the body.
        let found = match &self.markup {
            Some(markup) => match get_or_compile(selector) {
                Some(matcher) => Document::from(markup.as_str())
                    .select_matcher(&matcher)
                    .exists(),
                None => false,
            },
            None => false,
        };
        Ok(found)
    }

    async fn markup(&mut self) -> Result<String, RenderError> {
        self.markup
            .clone()
            .ok_or_else(|| RenderError::backend(anyhow::anyhow!("markup requested before navigation")))
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        self.markup = None;
        Ok(())
    }
}

/// Maps reqwest failures onto the rendering taxonomy, keeping timeouts
/// distinguishable for retry logging.
fn classify(url: &str, timeout: Duration, err: reqwest::Error) -> RenderError {
    if err.is_timeout() {
        RenderError::Timeout(timeout)
    } else {
        RenderError::navigation(url, err)
    }
}
