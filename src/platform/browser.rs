use crate::state::{
    icon::IconPaths,
    tab::{ActiveTabsState, Tab, TabId, WindowId},
};
use async_trait::async_trait;
use lifeline::impl_storage_clone;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

/// A tab as reported by the browser.  Tabs which have not yet navigated may be missing an id or url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserTab {
    pub id: Option<TabId>,
    pub window_id: Option<WindowId>,
    pub url: Option<String>,
    pub active: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TabQuery {
    /// Every open tab, in every window
    All,
    /// The active tab of each window
    Active,
}

/// The host browser.  Implemented by the extension runtime that embeds this crate.
#[async_trait]
pub trait BrowserPlatform: Send + Sync {
    async fn query_tabs(&self, query: TabQuery) -> anyhow::Result<Vec<BrowserTab>>;

    /// The toolbar action, if the browser provides one
    fn browser_action(&self) -> Option<Arc<dyn BadgeAction>>;

    /// The sidebar action, if the browser provides one
    fn sidebar_action(&self) -> Option<Arc<dyn BadgeAction>> {
        None
    }
}

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{0} is not supported by this surface")]
    Unsupported(&'static str),
    #[error(transparent)]
    Platform(#[from] anyhow::Error),
}

/// A surface which can render the extension badge (the toolbar action, or the sidebar action).
///
/// Operations a surface cannot perform return `ActionError::Unsupported`.
#[async_trait]
pub trait BadgeAction: Send + Sync {
    fn name(&self) -> &'static str;

    async fn set_icon(&self, icon: &IconPaths, tab_id: Option<TabId>) -> Result<(), ActionError>;

    async fn set_badge_text(&self, text: &str, tab_id: Option<TabId>) -> Result<(), ActionError>;

    async fn set_badge_background_color(
        &self,
        color: &str,
        tab_id: Option<TabId>,
    ) -> Result<(), ActionError>;
}

/// Shares the host browser with the services on the `BadgeBus`
#[derive(Clone)]
pub struct BrowserResource(pub Arc<dyn BrowserPlatform>);

impl Debug for BrowserResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BrowserResource").finish()
    }
}

impl_storage_clone!(BrowserResource);

/// Queries the active tab of each window.  Tabs without an id or url are not yet navigable, and are skipped.
pub async fn query_active_tabs(platform: &dyn BrowserPlatform) -> anyhow::Result<ActiveTabsState> {
    let tabs = platform.query_tabs(TabQuery::Active).await?;

    let tabs = tabs
        .into_iter()
        .filter_map(|tab| match (tab.id, tab.url) {
            (Some(id), Some(url)) => Some(Tab::new(id, url)),
            _ => None,
        });

    Ok(ActiveTabsState::new(tabs))
}

/// Queries the ids of every open tab
pub async fn query_tab_ids(platform: &dyn BrowserPlatform) -> anyhow::Result<Vec<TabId>> {
    let tabs = platform.query_tabs(TabQuery::All).await?;
    Ok(tabs.into_iter().filter_map(|tab| tab.id).collect())
}
