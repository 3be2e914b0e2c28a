use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::scraper::config::ScraperConfig;
use crate::scraper::{Locator, Pacer, RenderClient, RenderError, Severity};

/// Result of one interaction step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A control was found and clicked
    Success,
    /// No candidate became clickable within its timeout
    NotFound,
    /// A candidate was found but the click did not go through
    Blocked,
}

/// Faults that end a scrape session for one URL
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to load {url}: {source}")]
    Load {
        url: String,
        #[source]
        source: RenderError,
    },

    #[error("failed to capture page markup: {0}")]
    Snapshot(#[source] RenderError),

    #[error("failed to open browser: {0}")]
    Open(#[source] RenderError),

    #[error("session cancelled")]
    Cancelled,
}

/// Click bookkeeping for the reveal loop of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub clicks: u32,
    pub max_clicks: u32,
    pub last_outcome: Option<ActionOutcome>,
}

impl PaginationState {
    pub fn new(max_clicks: u32) -> Self {
        Self {
            clicks: 0,
            max_clicks,
            last_outcome: None,
        }
    }

    pub fn record(&mut self, outcome: ActionOutcome) {
        if outcome == ActionOutcome::Success {
            self.clicks += 1;
        }
        self.last_outcome = Some(outcome);
    }

    /// True once the click ceiling is reached
    pub fn exhausted(&self) -> bool {
        self.clicks >= self.max_clicks
    }
}

/// What a finished session observed
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub url: String,
    pub markup: String,
    pub consent: ActionOutcome,
    pub navigation: ActionOutcome,
    pub pagination: PaginationState,
}

/// Drives one product page through consent, navigation and reveal.
///
/// Actions run strictly in order: each one depends on the DOM left behind
/// by the previous one. Only a failed initial load (or cancellation) ends
/// the session early; every other miss degrades to "control unavailable".
#[derive(Debug, Clone)]
pub struct PaginationController {
    config: ScraperConfig,
    pacer: Pacer,
    cancel: CancellationToken,
}

impl PaginationController {
    pub fn new(config: ScraperConfig) -> Self {
        let pacer = Pacer::new(config.delays.clone());
        Self {
            config,
            pacer,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run a full session against an already-open client
    pub async fn run<C: RenderClient>(
        &self,
        client: &C,
        url: &str,
    ) -> Result<SessionReport, SessionError> {
        info!("Loading product page: {}", url);
        self.guard(client.load(url))
            .await?
            .map_err(|source| SessionError::Load {
                url: url.to_string(),
                source,
            })?;
        self.pacer.pause(Severity::Medium, &self.cancel).await?;

        let consent = self.dismiss_consent(client).await?;
        let navigation = self.navigate_to_reviews(client).await?;
        let pagination = self.reveal_all(client).await?;

        let markup = self
            .guard(client.current_markup())
            .await?
            .map_err(SessionError::Snapshot)?;

        Ok(SessionReport {
            url: url.to_string(),
            markup,
            consent,
            navigation,
            pagination,
        })
    }

    /// Click the first consent button that shows up. Never fatal.
    pub async fn dismiss_consent<C: RenderClient>(
        &self,
        client: &C,
    ) -> Result<ActionOutcome, SessionError> {
        let outcome = self
            .click_first(
                client,
                &self.config.consent_locators,
                self.config.consent_timeout(),
            )
            .await?;

        if outcome == ActionOutcome::Success {
            debug!("Dismissed consent prompt");
            self.pacer.pause(Severity::Short, &self.cancel).await?;
        }
        Ok(outcome)
    }

    /// Open the reviews section. Missing tab is fine, reviews may already be visible.
    pub async fn navigate_to_reviews<C: RenderClient>(
        &self,
        client: &C,
    ) -> Result<ActionOutcome, SessionError> {
        let outcome = self
            .click_first(
                client,
                &self.config.navigation_locators,
                self.config.navigation_timeout(),
            )
            .await?;

        if outcome == ActionOutcome::Success {
            info!("Navigated to reviews section");
            self.pacer.pause(Severity::Medium, &self.cancel).await?;
        } else {
            info!("Could not find reviews tab, continuing with current page");
        }
        Ok(outcome)
    }

    /// Click reveal controls until none is left or the ceiling is hit
    pub async fn reveal_all<C: RenderClient>(
        &self,
        client: &C,
    ) -> Result<PaginationState, SessionError> {
        let mut state = PaginationState::new(self.config.max_clicks);

        while !state.exhausted() {
            let outcome = self
                .click_first(
                    client,
                    &self.config.reveal_locators,
                    self.config.reveal_timeout(),
                )
                .await?;
            state.record(outcome);

            if outcome != ActionOutcome::Success {
                info!("No more reveal controls found after {} clicks", state.clicks);
                return Ok(state);
            }

            info!("Clicked reveal control ({}/{})", state.clicks, state.max_clicks);
            self.pacer.pause(Severity::Medium, &self.cancel).await?;
        }

        info!("Reached maximum click limit ({})", state.max_clicks);
        Ok(state)
    }

    /// Walk the locators in order and click the first clickable candidate.
    ///
    /// A candidate whose click fails does not stop the walk; the next
    /// locator is tried. Returns `Blocked` only if something was found
    /// but nothing could be clicked.
    async fn click_first<C: RenderClient>(
        &self,
        client: &C,
        locators: &[Locator],
        timeout: Duration,
    ) -> Result<ActionOutcome, SessionError> {
        let mut outcome = ActionOutcome::NotFound;

        for locator in locators {
            let Some(handle) = self
                .guard(client.wait_until_clickable(locator, timeout))
                .await?
            else {
                debug!("No clickable element for {}", locator);
                continue;
            };

            match self.try_click(client, &handle).await? {
                ActionOutcome::Success => return Ok(ActionOutcome::Success),
                ActionOutcome::Blocked => {
                    debug!("Click on {} did not go through", locator);
                    outcome = ActionOutcome::Blocked;
                }
                ActionOutcome::NotFound => {
                    debug!("Element for {} vanished before click", locator);
                }
            }
        }

        Ok(outcome)
    }

    async fn try_click<C: RenderClient>(
        &self,
        client: &C,
        handle: &C::Handle,
    ) -> Result<ActionOutcome, SessionError> {
        // Layout may have shifted since the wait; re-check right before clicking
        if !self.guard(client.is_visible(handle)).await? {
            return Ok(ActionOutcome::NotFound);
        }

        self.guard(client.scroll_into_view(handle)).await?;
        self.pacer.pause(Severity::Short, &self.cancel).await?;

        let clicked = self.guard(client.click(handle)).await?;
        Ok(if clicked.succeeded() {
            ActionOutcome::Success
        } else {
            ActionOutcome::Blocked
        })
    }

    /// Race a client call against the cancel token
    async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, SessionError> {
        if self.cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        tokio::select! {
            out = fut => Ok(out),
            _ = self.cancel.cancelled() => Err(SessionError::Cancelled),
        }
    }
}
