// ABOUTME: Retry-wrapped fetch orchestrator: session per attempt, settle, capture, extract.
// ABOUTME: Transport failures retry up to the bound; every outcome is an in-band Extraction.

//! Fetch orchestration.
//!
//! [`Scraper::fetch_and_extract`] owns the full per-URL pipeline: open a
//! rendering session, navigate, let dynamic content settle, capture markup,
//! run the extraction engine. Transport failures are retried with a fresh
//! session up to `max_retries`; extraction failures are already usable
//! results and are never retried.
//!
//! Key behaviors:
//! - The session is released on every exit path before the outcome is
//!   inspected, so cleanup never depends on success.
//! - Sites with a registered wait hint get a live-DOM wait on their body
//!   selector, falling back to a fixed sleep of the hint duration; all other
//!   sites sleep the configured settle delay.
//! - Nothing here returns `Err`: exhausted retries and unexpected states
//!   come back as `"Error"`-titled sentinel results.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::engine::Extractor;
use crate::error::{ProfileError, RenderError};
use crate::loader::load_builtin_registry;
use crate::profile::ProfileRegistry;
use crate::render::{RenderBackend, RenderSession, SessionConfig};
use crate::result::Extraction;
use crate::site::site_key;

/// Default number of rendering attempts per URL.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Timing and retry knobs for the orchestrator.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Rendering attempts per URL before giving up.
    pub max_retries: u32,
    /// Page-load timeout per navigation.
    pub page_load_timeout: Duration,
    /// Live-DOM wait for the body selector on wait-hinted sites.
    pub selector_wait: Duration,
    /// Fixed settle sleep for sites without a wait hint.
    pub settle_delay: Duration,
    /// Pause between failed attempts.
    pub retry_delay: Duration,
    /// Session options handed to the backend.
    pub session: SessionConfig,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        ScrapeOptions {
            max_retries: DEFAULT_MAX_RETRIES,
            page_load_timeout: Duration::from_secs(60),
            selector_wait: Duration::from_secs(10),
            settle_delay: Duration::from_secs(15),
            retry_delay: Duration::from_secs(2),
            session: SessionConfig::default(),
        }
    }
}

/// Builder for [`Scraper`].
///
/// The profile table defaults to the built-in one; timing knobs default to
/// [`ScrapeOptions::default`].
pub struct ScraperBuilder {
    backend: Arc<dyn RenderBackend>,
    registry: Option<ProfileRegistry>,
    opts: ScrapeOptions,
}

impl ScraperBuilder {
    pub fn new(backend: impl RenderBackend + 'static) -> Self {
        ScraperBuilder {
            backend: Arc::new(backend),
            registry: None,
            opts: ScrapeOptions::default(),
        }
    }

    /// Replaces the built-in profile table.
    pub fn registry(mut self, registry: ProfileRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces every timing and retry knob at once.
    pub fn options(mut self, opts: ScrapeOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.opts.max_retries = max_retries;
        self
    }

    pub fn page_load_timeout(mut self, timeout: Duration) -> Self {
        self.opts.page_load_timeout = timeout;
        self
    }

    pub fn selector_wait(mut self, wait: Duration) -> Self {
        self.opts.selector_wait = wait;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.opts.settle_delay = delay;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.opts.retry_delay = delay;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.session.user_agent = user_agent.into();
        self
    }

    /// Builds the scraper, loading the built-in profile table when none was
    /// injected.
    pub fn build(self) -> Result<Scraper, ProfileError> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => load_builtin_registry()?,
        };
        Ok(Scraper {
            backend: self.backend,
            extractor: Extractor::new(registry),
            opts: self.opts,
        })
    }
}

/// Orchestrates rendering and extraction for one URL at a time.
///
/// Cheap to clone; clones share the backend and profile table.
#[derive(Clone)]
pub struct Scraper {
    backend: Arc<dyn RenderBackend>,
    extractor: Extractor,
    opts: ScrapeOptions,
}

impl fmt::Debug for Scraper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scraper")
            .field("backend", &self.backend.name())
            .field("extractor", &self.extractor)
            .field("opts", &self.opts)
            .finish()
    }
}

impl Scraper {
    pub fn builder(backend: impl RenderBackend + 'static) -> ScraperBuilder {
        ScraperBuilder::new(backend)
    }

    /// The engine this scraper feeds captured markup into.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn options(&self) -> &ScrapeOptions {
        &self.opts
    }

    /// Fetches `url` through the rendering backend and extracts the
    /// article.
    ///
    /// Never returns an error: transport exhaustion and unexpected states
    /// are reported through the sentinel-result shapes.
    pub async fn fetch_and_extract(&self, url: &str) -> Extraction {
        let key = site_key(url);
        let mut last_err: Option<RenderError> = None;

        for attempt in 1..=self.opts.max_retries {
            info!(
                attempt,
                url,
                backend = self.backend.name(),
                "rendering attempt"
            );
            match self.attempt(url, &key).await {
                Ok(markup) => return self.extractor.extract(&markup, &key),
                Err(err) => {
                    error!(attempt, url, error = %err, "rendering attempt failed");
                    last_err = Some(err);
                    if attempt < self.opts.max_retries {
                        tokio::time::sleep(self.opts.retry_delay).await;
                    }
                }
            }
        }

        match last_err {
            Some(err) => Extraction::backend_failure(self.opts.max_retries, err),
            None => Extraction::internal_failure("no rendering attempts were made"),
        }
    }

    /// One full attempt: open, drive, always close, then hand back the
    /// captured markup.
    async fn attempt(&self, url: &str, key: &str) -> Result<String, RenderError> {
        let mut session = self.backend.new_session(&self.opts.session).await?;
        let driven = self.drive(session.as_mut(), url, key).await;
        if let Err(err) = session.close().await {
            warn!(url, error = %err, "session close failed");
        }
        driven
    }

    /// Navigate, settle, capture.
    async fn drive(
        &self,
        session: &mut dyn RenderSession,
        url: &str,
        key: &str,
    ) -> Result<String, RenderError> {
        session.navigate(url, self.opts.page_load_timeout).await?;

        let profile = self.extractor.registry().lookup(key);
        match profile.wait_hint() {
            Some(hint) => {
                let found = session
                    .wait_for_selector(&profile.body.selector, self.opts.selector_wait)
                    .await?;
                if !found {
                    warn!(
                        url,
                        selector = %profile.body.selector,
                        "body selector did not appear, settling blind"
                    );
                    tokio::time::sleep(hint).await;
                }
            }
            None => tokio::time::sleep(self.opts.settle_delay).await,
        }

        session.markup().await
    }
}
