//! Scripted in-memory render client used by the controller and harvester tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::scraper::{ClickOutcome, Locator, RenderClient, RenderClientFactory, RenderError};

/// How long a scripted control stays on the page
#[derive(Debug, Clone, Copy)]
pub enum Presence {
    Always,
    /// Disappears after this many successful clicks
    Times(u32),
}

#[derive(Debug, Default)]
struct FakeState {
    controls: HashMap<String, Presence>,
    clicks: HashMap<String, u32>,
}

pub struct FakeClient {
    markup: String,
    fail_load: bool,
    visible: bool,
    click_outcome: ClickOutcome,
    state: Mutex<FakeState>,
    loads: AtomicUsize,
}

impl FakeClient {
    pub fn new(markup: &str) -> Self {
        Self {
            markup: markup.to_string(),
            fail_load: false,
            visible: true,
            click_outcome: ClickOutcome::Clicked,
            state: Mutex::new(FakeState::default()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn with(self, locator: &Locator, presence: Presence) -> Self {
        self.state
            .lock()
            .unwrap()
            .controls
            .insert(locator.xpath().to_string(), presence);
        self
    }

    pub fn with_click_outcome(mut self, outcome: ClickOutcome) -> Self {
        self.click_outcome = outcome;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub fn clicks_on(&self, locator: &Locator) -> u32 {
        let state = self.state.lock().unwrap();
        state.clicks.get(locator.xpath()).copied().unwrap_or(0)
    }

    pub fn total_clicks(&self) -> u32 {
        self.state.lock().unwrap().clicks.values().sum()
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn present(&self, xpath: &str) -> bool {
        let state = self.state.lock().unwrap();
        match state.controls.get(xpath) {
            Some(Presence::Always) => true,
            Some(Presence::Times(n)) => *n > 0,
            None => false,
        }
    }
}

#[async_trait]
impl RenderClient for FakeClient {
    type Handle = String;

    async fn load(&self, url: &str) -> Result<(), RenderError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return Err(RenderError::Navigation(format!("unreachable: {}", url)));
        }
        Ok(())
    }

    async fn find_candidates(&self, locators: &[Locator]) -> Vec<String> {
        locators
            .iter()
            .filter(|l| self.present(l.xpath()))
            .map(|l| l.xpath().to_string())
            .collect()
    }

    async fn is_visible(&self, _handle: &String) -> bool {
        self.visible
    }

    async fn scroll_into_view(&self, _handle: &String) {}

    async fn click(&self, handle: &String) -> ClickOutcome {
        if !self.click_outcome.succeeded() {
            return self.click_outcome;
        }
        let mut state = self.state.lock().unwrap();
        if let Some(Presence::Times(n)) = state.controls.get_mut(handle) {
            *n = n.saturating_sub(1);
        }
        *state.clicks.entry(handle.clone()).or_default() += 1;
        self.click_outcome
    }

    async fn wait_until_clickable(&self, locator: &Locator, _timeout: Duration) -> Option<String> {
        self.find_candidates(std::slice::from_ref(locator))
            .await
            .into_iter()
            .next()
    }

    async fn current_markup(&self) -> Result<String, RenderError> {
        Ok(self.markup.clone())
    }

    async fn close(&self) {}
}

/// Hands out fake clients keyed by URL; unknown URLs fail to load
#[derive(Default)]
pub struct FakeFactory {
    pages: HashMap<String, String>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
    fail_open: bool,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, markup: &str) -> Self {
        self.pages.insert(url.to_string(), markup.to_string());
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }
}

/// Client produced by [`FakeFactory`]: serves the markup of whichever URL it loads
pub struct RoutedClient {
    pages: HashMap<String, String>,
    inner: Mutex<Option<FakeClient>>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderClient for RoutedClient {
    type Handle = String;

    async fn load(&self, url: &str) -> Result<(), RenderError> {
        let client = match self.pages.get(url) {
            Some(markup) => FakeClient::new(markup),
            None => FakeClient::new("").failing_load(),
        };
        let result = client.load(url).await;
        *self.inner.lock().unwrap() = Some(client);
        result
    }

    async fn find_candidates(&self, _locators: &[Locator]) -> Vec<String> {
        Vec::new()
    }

    async fn is_visible(&self, _handle: &String) -> bool {
        false
    }

    async fn scroll_into_view(&self, _handle: &String) {}

    async fn click(&self, _handle: &String) -> ClickOutcome {
        ClickOutcome::Failed
    }

    async fn wait_until_clickable(&self, _locator: &Locator, _timeout: Duration) -> Option<String> {
        None
    }

    async fn current_markup(&self) -> Result<String, RenderError> {
        let inner = self.inner.lock().unwrap();
        inner
            .as_ref()
            .map(|c| c.markup.clone())
            .ok_or(RenderError::Closed)
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RenderClientFactory for FakeFactory {
    type Client = RoutedClient;

    async fn open(&self) -> Result<RoutedClient, RenderError> {
        if self.fail_open {
            return Err(RenderError::Launch("no browser".into()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(RoutedClient {
            pages: self.pages.clone(),
            inner: Mutex::new(None),
            closed: self.closed.clone(),
        })
    }
}
