use super::browser::{
    query_active_tabs, query_tab_ids, ActionError, BadgeAction, BrowserPlatform, BrowserResource,
};
use crate::prelude::*;
use crate::state::{
    badge::RawBadgeState,
    tab::{ActiveTabsState, Tab, TabId},
};
use async_trait::async_trait;
use futures_util::future::{join3, join_all};
use postage::watch;
use std::sync::Arc;

/// Renders resolved badge states, and reports the browser's tabs.
#[async_trait]
pub trait BadgeBrowserApi: Send + Sync {
    /// A receiver of active tab snapshots.  The latest snapshot is replayed on the first `recv`.
    fn active_tabs_updated(&self) -> watch::Receiver<ActiveTabsState>;

    /// Applies the state to the given tab, or globally if `tab_id` is None
    async fn set_state(&self, state: &RawBadgeState, tab_id: Option<TabId>) -> anyhow::Result<()>;

    async fn get_tabs(&self) -> anyhow::Result<Vec<TabId>>;

    async fn get_active_tabs(&self) -> anyhow::Result<Vec<Tab>>;
}

/// Renders badge states onto every surface the browser supports.
pub struct DefaultBadgeBrowserApi {
    platform: Arc<dyn BrowserPlatform>,
    actions: Vec<Arc<dyn BadgeAction>>,
    rx_active_tabs: watch::Receiver<ActiveTabsState>,
}

impl DefaultBadgeBrowserApi {
    pub fn new(
        platform: Arc<dyn BrowserPlatform>,
        rx_active_tabs: watch::Receiver<ActiveTabsState>,
    ) -> Self {
        let actions: Vec<Arc<dyn BadgeAction>> = platform
            .browser_action()
            .into_iter()
            .chain(platform.sidebar_action())
            .collect();

        debug!(
            "badge surfaces: {:?}",
            actions.iter().map(|action| action.name()).collect::<Vec<_>>()
        );

        Self {
            platform,
            actions,
            rx_active_tabs,
        }
    }

    pub fn from_bus(bus: &BadgeBus) -> anyhow::Result<Self> {
        let BrowserResource(platform) = bus.resource::<BrowserResource>()?;
        let rx_active_tabs = bus.rx::<ActiveTabsState>()?;

        Ok(Self::new(platform, rx_active_tabs))
    }

    /// Attempts text, icon and color independently.  Icon and color are only pushed with a background color.
    async fn set_action_state(
        action: &dyn BadgeAction,
        state: &RawBadgeState,
        tab_id: Option<TabId>,
    ) -> anyhow::Result<()> {
        let name = action.name();
        let text = action.set_badge_text(state.text.as_str(), tab_id);

        if state.background_color.is_empty() {
            return settle(name, text.await);
        }

        let (text, icon, color) = join3(
            text,
            action.set_icon(&state.icon, tab_id),
            action.set_badge_background_color(state.background_color.as_str(), tab_id),
        )
        .await;

        let results = vec![settle(name, text), settle(name, icon), settle(name, color)];
        results.into_iter().collect()
    }
}

fn settle(name: &'static str, result: Result<(), ActionError>) -> anyhow::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(ActionError::Unsupported(operation)) => {
            debug!("{} does not support {}", name, operation);
            Ok(())
        }
        Err(ActionError::Platform(err)) => Err(err.context(format!("{} update failed", name))),
    }
}

#[async_trait]
impl BadgeBrowserApi for DefaultBadgeBrowserApi {
    fn active_tabs_updated(&self) -> watch::Receiver<ActiveTabsState> {
        self.rx_active_tabs.clone()
    }

    async fn set_state(&self, state: &RawBadgeState, tab_id: Option<TabId>) -> anyhow::Result<()> {
        let updates = self
            .actions
            .iter()
            .map(|action| Self::set_action_state(action.as_ref(), state, tab_id));

        let results = join_all(updates).await;
        results.into_iter().collect()
    }

    async fn get_tabs(&self) -> anyhow::Result<Vec<TabId>> {
        query_tab_ids(self.platform.as_ref()).await
    }

    async fn get_active_tabs(&self) -> anyhow::Result<Vec<Tab>> {
        let state = query_active_tabs(self.platform.as_ref()).await?;
        Ok(state.tabs)
    }
}
