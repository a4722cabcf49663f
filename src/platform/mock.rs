use super::{
    badge_api::BadgeBrowserApi,
    browser::{ActionError, BadgeAction, BrowserPlatform, BrowserTab, TabQuery},
};
use crate::state::{
    badge::RawBadgeState,
    icon::IconPaths,
    tab::{ActiveTabsState, Tab, TabId, WindowId},
};
use async_trait::async_trait;
use postage::{sink::Sink, watch};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Icon(IconPaths, Option<TabId>),
    Text(String, Option<TabId>),
    Color(String, Option<TabId>),
}

/// A badge surface which records every call
pub struct FakeAction {
    name: &'static str,
    calls: Mutex<Vec<RenderCall>>,
    unsupported_color: AtomicBool,
    failing: AtomicBool,
}

impl FakeAction {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Mutex::new(Vec::new()),
            unsupported_color: AtomicBool::new(false),
            failing: AtomicBool::new(false),
        }
    }

    fn record(&self, call: RenderCall) -> Result<(), ActionError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ActionError::Platform(anyhow::Error::msg("surface failed")));
        }

        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl BadgeAction for FakeAction {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn set_icon(&self, icon: &IconPaths, tab_id: Option<TabId>) -> Result<(), ActionError> {
        self.record(RenderCall::Icon(icon.clone(), tab_id))
    }

    async fn set_badge_text(&self, text: &str, tab_id: Option<TabId>) -> Result<(), ActionError> {
        self.record(RenderCall::Text(text.to_string(), tab_id))
    }

    async fn set_badge_background_color(
        &self,
        color: &str,
        tab_id: Option<TabId>,
    ) -> Result<(), ActionError> {
        if self.unsupported_color.load(Ordering::SeqCst) {
            return Err(ActionError::Unsupported("set_badge_background_color"));
        }

        self.record(RenderCall::Color(color.to_string(), tab_id))
    }
}

/// An in-memory browser, with a toolbar action and an optional sidebar action
pub struct FakeBrowser {
    tabs: Mutex<Vec<BrowserTab>>,
    browser_action: Arc<FakeAction>,
    sidebar_action: Option<Arc<FakeAction>>,
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self {
            tabs: Mutex::new(Vec::new()),
            browser_action: Arc::new(FakeAction::new("browser_action")),
            sidebar_action: None,
        }
    }
}

impl FakeBrowser {
    pub fn with_sidebar() -> Self {
        Self {
            sidebar_action: Some(Arc::new(FakeAction::new("sidebar_action"))),
            ..Self::default()
        }
    }

    fn action(&self, surface: &str) -> &FakeAction {
        match surface {
            "sidebar_action" => self
                .sidebar_action
                .as_ref()
                .expect("sidebar action is not enabled"),
            _ => &self.browser_action,
        }
    }

    pub fn calls(&self, surface: &str) -> Vec<RenderCall> {
        self.action(surface).calls.lock().unwrap().clone()
    }

    pub fn set_unsupported_color(&self, surface: &str) {
        self.action(surface)
            .unsupported_color
            .store(true, Ordering::SeqCst);
    }

    pub fn set_failing(&self, surface: &str) {
        self.action(surface).failing.store(true, Ordering::SeqCst);
    }

    pub fn open_tab(&self, id: u32, window: u32, url: Option<&str>, active: bool) {
        self.tabs.lock().unwrap().push(BrowserTab {
            id: Some(TabId(id)),
            window_id: Some(WindowId(window)),
            url: url.map(str::to_string),
            active,
        });
    }

    pub fn navigate(&self, id: u32, url: &str) {
        let mut tabs = self.tabs.lock().unwrap();
        for tab in tabs.iter_mut().filter(|tab| tab.id == Some(TabId(id))) {
            tab.url = Some(url.to_string());
        }
    }
}

#[async_trait]
impl BrowserPlatform for FakeBrowser {
    async fn query_tabs(&self, query: TabQuery) -> anyhow::Result<Vec<BrowserTab>> {
        let tabs = self.tabs.lock().unwrap();
        let tabs = tabs
            .iter()
            .filter(|tab| query == TabQuery::All || tab.active)
            .cloned()
            .collect();

        Ok(tabs)
    }

    fn browser_action(&self) -> Option<Arc<dyn BadgeAction>> {
        Some(self.browser_action.clone())
    }

    fn sidebar_action(&self) -> Option<Arc<dyn BadgeAction>> {
        self.sidebar_action
            .clone()
            .map(|action| action as Arc<dyn BadgeAction>)
    }
}

/// Records rendered states by tab, and publishes a configurable set of active tabs
pub struct MockBadgeBrowserApi {
    tabs: Mutex<Vec<TabId>>,
    tx_active_tabs: tokio::sync::Mutex<watch::Sender<ActiveTabsState>>,
    rx_active_tabs: watch::Receiver<ActiveTabsState>,
    general_state: Mutex<Option<RawBadgeState>>,
    specific_states: Mutex<HashMap<TabId, RawBadgeState>>,
    render_count: AtomicUsize,
    failing: AtomicBool,
}

impl MockBadgeBrowserApi {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel();

        Self {
            tabs: Mutex::new(Vec::new()),
            tx_active_tabs: tokio::sync::Mutex::new(tx),
            rx_active_tabs: rx,
            general_state: Mutex::new(None),
            specific_states: Mutex::new(HashMap::new()),
            render_count: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn url(id: TabId) -> String {
        format!("https://example.com/{}", id)
    }

    fn active_tabs(&self) -> Vec<Tab> {
        self.tabs
            .lock()
            .unwrap()
            .iter()
            .map(|id| Tab::new(*id, Self::url(*id)))
            .collect()
    }

    /// Sets the active tabs, and publishes them to listeners
    pub async fn set_tabs(&self, ids: &[u32]) {
        *self.tabs.lock().unwrap() = ids.iter().map(|id| TabId(*id)).collect();

        let state = ActiveTabsState::new(self.active_tabs());
        self.tx_active_tabs.lock().await.send(state).await.ok();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn general_state(&self) -> Option<RawBadgeState> {
        self.general_state.lock().unwrap().clone()
    }

    pub fn specific_state(&self, id: u32) -> Option<RawBadgeState> {
        self.specific_states.lock().unwrap().get(&TabId(id)).cloned()
    }

    pub fn specific_states(&self) -> HashMap<TabId, RawBadgeState> {
        self.specific_states.lock().unwrap().clone()
    }

    pub fn render_count(&self) -> usize {
        self.render_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BadgeBrowserApi for MockBadgeBrowserApi {
    fn active_tabs_updated(&self) -> watch::Receiver<ActiveTabsState> {
        self.rx_active_tabs.clone()
    }

    async fn set_state(&self, state: &RawBadgeState, tab_id: Option<TabId>) -> anyhow::Result<()> {
        self.render_count.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow::Error::msg("render failed"));
        }

        match tab_id {
            Some(id) => {
                self.specific_states
                    .lock()
                    .unwrap()
                    .insert(id, state.clone());
            }
            None => {
                *self.general_state.lock().unwrap() = Some(state.clone());
            }
        }

        Ok(())
    }

    async fn get_tabs(&self) -> anyhow::Result<Vec<TabId>> {
        Ok(self.tabs.lock().unwrap().clone())
    }

    async fn get_active_tabs(&self) -> anyhow::Result<Vec<Tab>> {
        Ok(self.active_tabs())
    }
}
