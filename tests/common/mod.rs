#![cfg(test)]

use async_trait::async_trait;
use log::LevelFilter;
use simplelog::{TermLogger, TerminalMode};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, Once},
    time::Duration,
};
use tab_badge::{
    platform::{
        browser::{ActionError, BadgeAction, BrowserPlatform, BrowserTab, TabQuery},
        cipher::{AtRiskCipherSource, CipherCounter},
    },
    state::{
        icon::IconPaths,
        tab::{TabId, WindowId},
    },
};
use tokio::time;

static INIT: Once = Once::new();

/// Setup function that is only run once, even if called multiple times.
pub fn setup() {
    INIT.call_once(|| {
        TermLogger::init(
            LevelFilter::Info,
            simplelog::ConfigBuilder::new()
                .set_time_format_str("%H:%M:%S%.3f TST")
                .build(),
            TerminalMode::Stderr,
        )
        .unwrap();
    });
}

/// The badge as shown on one surface, for one tab (or globally)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub text: Option<String>,
    pub color: Option<String>,
    pub icon: Option<IconPaths>,
}

#[derive(Default)]
pub struct TestAction {
    rendered: Mutex<HashMap<Option<TabId>, Rendered>>,
}

impl TestAction {
    fn update(&self, tab_id: Option<TabId>, update: impl FnOnce(&mut Rendered)) {
        let mut rendered = self.rendered.lock().unwrap();
        update(rendered.entry(tab_id).or_default());
    }
}

#[async_trait]
impl BadgeAction for TestAction {
    fn name(&self) -> &'static str {
        "browser_action"
    }

    async fn set_icon(&self, icon: &IconPaths, tab_id: Option<TabId>) -> Result<(), ActionError> {
        self.update(tab_id, |rendered| rendered.icon = Some(icon.clone()));
        Ok(())
    }

    async fn set_badge_text(&self, text: &str, tab_id: Option<TabId>) -> Result<(), ActionError> {
        self.update(tab_id, |rendered| rendered.text = Some(text.to_string()));
        Ok(())
    }

    async fn set_badge_background_color(
        &self,
        color: &str,
        tab_id: Option<TabId>,
    ) -> Result<(), ActionError> {
        self.update(tab_id, |rendered| rendered.color = Some(color.to_string()));
        Ok(())
    }
}

/// A browser with a single toolbar action, and a mutable set of tabs
#[derive(Default)]
pub struct TestBrowser {
    tabs: Mutex<Vec<BrowserTab>>,
    action: Arc<TestAction>,
}

#[allow(dead_code)]
impl TestBrowser {
    pub fn open(&self, id: u32, window: u32, url: &str) {
        let mut tabs = self.tabs.lock().unwrap();
        for tab in tabs.iter_mut() {
            if tab.window_id == Some(WindowId(window)) {
                tab.active = false;
            }
        }

        tabs.push(BrowserTab {
            id: Some(TabId(id)),
            window_id: Some(WindowId(window)),
            url: Some(url.to_string()),
            active: true,
        });
    }

    pub fn close(&self, id: u32) {
        self.tabs
            .lock()
            .unwrap()
            .retain(|tab| tab.id != Some(TabId(id)));
    }

    pub fn rendered(&self, tab_id: Option<u32>) -> Option<Rendered> {
        let rendered = self.action.rendered.lock().unwrap();
        rendered.get(&tab_id.map(TabId)).cloned()
    }

    /// Waits until the tab's badge satisfies the condition
    pub async fn await_rendered(&self, tab_id: Option<u32>, condition: impl Fn(&Rendered) -> bool) {
        loop {
            if let Some(rendered) = self.rendered(tab_id) {
                if condition(&rendered) {
                    return;
                }
            }

            time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl BrowserPlatform for TestBrowser {
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
        Some(self.action.clone())
    }
}

/// Counts logins by url
#[derive(Default)]
pub struct TestCiphers {
    counts: Mutex<HashMap<String, usize>>,
}

#[allow(dead_code)]
impl TestCiphers {
    pub fn set(&self, url: &str, count: usize) {
        self.counts.lock().unwrap().insert(url.to_string(), count);
    }
}

#[async_trait]
impl CipherCounter for TestCiphers {
    async fn count_for_url(&self, url: &str) -> anyhow::Result<usize> {
        Ok(self.counts.lock().unwrap().get(url).copied().unwrap_or(0))
    }
}

/// Urls with pending at-risk password changes
#[derive(Default)]
pub struct TestAtRisk {
    urls: Mutex<HashSet<String>>,
}

#[allow(dead_code)]
impl TestAtRisk {
    pub fn flag(&self, url: &str) {
        self.urls.lock().unwrap().insert(url.to_string());
    }
}

#[async_trait]
impl AtRiskCipherSource for TestAtRisk {
    async fn has_at_risk_logins(&self, url: &str) -> anyhow::Result<bool> {
        Ok(self.urls.lock().unwrap().contains(url))
    }
}
