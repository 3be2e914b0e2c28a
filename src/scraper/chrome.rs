use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use rand::seq::IndexedRandom;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::scraper::config::ScraperConfig;
use crate::scraper::scripts;
use crate::scraper::{ClickOutcome, Locator, RenderClient, RenderClientFactory, RenderError};

/// Launches a fresh Chrome instance for every session.
///
/// Each session gets its own browser process, so cookies and storage never
/// leak from one product page to the next.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    config: ScraperConfig,
}

impl ChromeLauncher {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RenderClientFactory for ChromeLauncher {
    type Client = ChromeRenderClient;

    async fn open(&self) -> Result<ChromeRenderClient, RenderError> {
        ChromeRenderClient::launch(self.config.clone()).await
    }
}

/// Chrome-backed render client using chromiumoxide
pub struct ChromeRenderClient {
    browser: Mutex<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    config: ScraperConfig,
}

impl ChromeRenderClient {
    /// Launch a browser with one blank page ready for navigation
    pub async fn launch(config: ScraperConfig) -> Result<Self, RenderError> {
        let user_agent = config.user_agents.choose(&mut rand::rng()).cloned();

        let mut builder = BrowserConfig::builder();
        for arg in scripts::browser_args(config.block_images, user_agent.as_deref()) {
            builder = builder.arg(arg);
        }
        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| RenderError::Launch(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            RenderError::Launch(format!(
                "{}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(RenderError::Launch(format!("Failed to create page: {}", e)));
            }
        };

        if let Err(e) = page
            .execute(AddScriptToEvaluateOnNewDocumentParams::new(scripts::STEALTH))
            .await
        {
            warn!("Failed to inject stealth script: {}", e);
        }

        if let Some(ref ua) = user_agent {
            if let Err(e) = page.set_user_agent(ua.as_str()).await {
                warn!("Failed to set user agent: {}", e);
            }
        }

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
            config,
        })
    }

    /// Call an element function and read its boolean result; anything else is `false`
    async fn eval_bool(&self, element: &Element, function: &str) -> bool {
        match element.call_js_fn(function, false).await {
            Ok(returns) => returns
                .result
                .value
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Err(e) => {
                debug!("Element script failed: {}", e);
                false
            }
        }
    }

    async fn find(&self, locator: &Locator) -> Vec<Element> {
        match self.page.find_xpaths(locator.xpath()).await {
            Ok(elements) => elements,
            Err(e) => {
                debug!("Lookup for {} failed: {}", locator, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl RenderClient for ChromeRenderClient {
    type Handle = Element;

    async fn load(&self, url: &str) -> Result<(), RenderError> {
        let timeout = self.config.page_load_timeout();
        let navigation = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| RenderError::Navigation(e.to_string()))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| RenderError::Navigation(e.to_string()))?;
            Ok(())
        };

        tokio::time::timeout(timeout, navigation)
            .await
            .map_err(|_| RenderError::Timeout(timeout))?
    }

    async fn find_candidates(&self, locators: &[Locator]) -> Vec<Element> {
        let mut found = Vec::new();
        for locator in locators {
            found.extend(self.find(locator).await);
        }
        found
    }

    async fn is_visible(&self, handle: &Element) -> bool {
        self.eval_bool(handle, scripts::IS_VISIBLE).await
    }

    async fn scroll_into_view(&self, handle: &Element) {
        if let Err(e) = handle.call_js_fn(scripts::SCROLL_INTO_VIEW, false).await {
            debug!("Scroll failed: {}", e);
        }
    }

    async fn click(&self, handle: &Element) -> ClickOutcome {
        if !self.eval_bool(handle, scripts::IS_INTERCEPTED).await {
            match handle.click().await {
                Ok(_) => return ClickOutcome::Clicked,
                Err(e) => debug!("Native click failed: {}", e),
            }
        }

        if self.eval_bool(handle, scripts::FORCE_CLICK).await {
            ClickOutcome::ForcedClick
        } else {
            ClickOutcome::Failed
        }
    }

    async fn wait_until_clickable(&self, locator: &Locator, timeout: Duration) -> Option<Element> {
        let deadline = Instant::now() + timeout;

        loop {
            for element in self.find(locator).await {
                if self.eval_bool(&element, scripts::IS_CLICKABLE).await {
                    return Some(element);
                }
            }

            if Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    async fn current_markup(&self) -> Result<String, RenderError> {
        // JS snapshot first, it reflects the live DOM after all clicks
        if let Ok(value) = self.page.evaluate(scripts::OUTER_HTML).await {
            if let Ok(html) = value.into_value::<String>() {
                if !html.is_empty() {
                    return Ok(html);
                }
            }
        }

        self.page
            .content()
            .await
            .map_err(|e| RenderError::Script(e.to_string()))
    }

    async fn close(&self) {
        if let Err(e) = self.page.clone().close().await {
            debug!("Failed to close page: {}", e);
        }

        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            debug!("Failed to close browser: {}", e);
        }
        let _ = browser.wait().await;
        self.handler.abort();
    }
}
