// ABOUTME: Headless-Chromium rendering backend over chromiumoxide (cargo feature "browser").
// ABOUTME: One browser per backend; each session drives an exclusive page.

//! Browser-based rendering.
//!
//! [`ChromiumBackend`] launches one Chromium process and hands out pages as
//! sessions. Scripts run, so client-side-rendered publishers produce real
//! markup here. Headless mode and automation masking are launch options;
//! per session only the user agent varies.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::RenderError;
use crate::render::{RenderBackend, RenderSession, SessionConfig};

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Rendering backend backed by a single headless Chromium process.
pub struct ChromiumBackend {
    browser: Mutex<Browser>,
    handler_task: JoinHandle<()>,
}

impl ChromiumBackend {
    /// Launches Chromium with `defaults` deciding headless mode and
    /// automation masking.
    pub async fn launch(defaults: &SessionConfig) -> Result<Self, RenderError> {
        let mut builder = BrowserConfig::builder();
        if !defaults.headless {
            builder = builder.with_head();
        }
        if defaults.mask_automation {
            builder = builder.arg("--disable-blink-features=AutomationControlled");
        }
        let config = builder
            .build()
            .map_err(|msg| RenderError::session(anyhow::anyhow!(msg)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(RenderError::session)?;

        // The CDP event stream must be drained or the browser stalls.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("chromium launched");
        Ok(ChromiumBackend {
            browser: Mutex::new(browser),
            handler_task,
        })
    }

    /// Closes the browser process and stops the event drain.
    pub async fn shutdown(self) -> Result<(), RenderError> {
        let mut browser = self.browser.into_inner();
        browser.close().await.map_err(RenderError::backend)?;
        self.handler_task.abort();
        Ok(())
    }
}

#[async_trait]
impl RenderBackend for ChromiumBackend {
    fn name(&self) -> &'static str {
        "chromium"
    }

    async fn new_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn RenderSession>, RenderError> {
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .map_err(RenderError::session)?
        };
        page.set_user_agent(config.user_agent.as_str())
            .await
            .map_err(RenderError::session)?;
        Ok(Box::new(ChromiumSession { page: Some(page) }))
    }
}

/// One exclusive page. `None` after close.
struct ChromiumSession {
    page: Option<Page>,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, RenderError> {
        self.page
            .as_ref()
            .ok_or_else(|| RenderError::backend(anyhow::anyhow!("session already closed")))
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError> {
        let page = self.page()?;
        let load = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(timeout, load).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(RenderError::navigation(url, err)),
            Err(_) => Err(RenderError::Timeout(timeout)),
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, RenderError> {
        // find_element errors both for missing nodes and transient protocol
        // hiccups; keep polling until the deadline either way.
        let page = self.page()?;
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn markup(&mut self) -> Result<String, RenderError> {
        self.page()?.content().await.map_err(RenderError::backend)
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        if let Some(page) = self.page.take() {
            page.close().await.map_err(RenderError::backend)?;
        }
        Ok(())
    }
}
