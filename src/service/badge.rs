use crate::{
    platform::badge_api::BadgeBrowserApi,
    prelude::*,
    state::{
        badge::{BadgeState, BadgeStates, StateSetting},
        priority::BadgeStatePriority,
        tab::{ActiveTabsState, Tab, TabId},
    },
    storage::{GlobalState, KeyDefinition, StateProvider},
};
use futures_util::future::{join, join_all};
use lifeline::impl_storage_clone;
use merge::{resolve, MergeTarget};
use std::{fmt::Debug, sync::Arc};

pub mod merge;

/// The contribution mapping, stored outside of any account.
pub const BADGE_STATES: KeyDefinition = KeyDefinition::new("badge", "badgeStates");

/// Merges named badge state contributions from feature services, and renders the result for each active tab.
///
/// Contributions are persisted in the `StateProvider`, so they outlive this handle.
/// Rendering is best effort: failures are logged, and never returned to callers.
#[derive(Clone)]
pub struct BadgeService {
    states: GlobalState<BadgeStates>,
    api: Arc<dyn BadgeBrowserApi>,
}

impl_storage_clone!(BadgeService);

impl Debug for BadgeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeService")
            .field("states", &self.states)
            .finish()
    }
}

impl BadgeService {
    pub fn new(provider: &StateProvider, api: Arc<dyn BadgeBrowserApi>) -> Self {
        Self {
            states: provider.global(BADGE_STATES),
            api,
        }
    }

    /// Renders the general state, and then every active tab each time the active tabs change.
    /// Dropping the returned lifeline stops the listener.  In-flight renders are not cancelled.
    pub fn start_listening(&self) -> Lifeline {
        let service = self.clone();
        let mut rx = self.api.active_tabs_updated();

        Self::task("listen", async move {
            if let Some(states) = service.load().await {
                service.render_general(&states).await;
            }

            while let Some(active) = rx.recv().await {
                if active.is_empty() {
                    continue;
                }

                trace!("active tabs updated: {:?}", &active);
                if let Some(states) = service.load().await {
                    let ids: Vec<TabId> = active.ids().collect();
                    service.render_tabs(&states, ids.as_slice()).await;
                }
            }
        })
    }

    /// Registers (or replaces) the named contribution, and re-renders the affected tabs.
    ///
    /// Without a `tab_id`, the contribution applies to every tab, and the general state.
    pub async fn set_state(
        &self,
        name: &str,
        priority: BadgeStatePriority,
        state: BadgeState,
        tab_id: Option<TabId>,
    ) {
        let setting = StateSetting {
            priority,
            state,
            tab_id,
        };

        let stored = self
            .states
            .update(|states| {
                states.insert(name, setting);
            })
            .await;

        if let Err(err) = stored {
            error!("Failed to store badge state {}: {}", name, err);
            return;
        }

        self.update_badge(tab_id).await;
    }

    /// Removes the named contribution, and re-renders the tabs it applied to.  Unknown names are ignored.
    pub async fn clear_state(&self, name: &str) {
        let removed = self.states.update_if(|states| states.remove(name)).await;

        match removed {
            Ok(Some(setting)) => self.update_badge(setting.tab_id).await,
            Ok(None) => trace!("no badge state named {}", name),
            Err(err) => error!("Failed to clear badge state {}: {}", name, err),
        }
    }

    /// The names of every registered contribution, in registration order
    pub async fn names(&self) -> Vec<String> {
        match self.load().await {
            Some(states) => states.names().map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    pub async fn get_active_tabs(&self) -> anyhow::Result<Vec<Tab>> {
        self.api.get_active_tabs().await
    }

    pub async fn get_tabs(&self) -> anyhow::Result<Vec<TabId>> {
        self.api.get_tabs().await
    }

    pub fn active_tabs_updated(&self) -> postage::watch::Receiver<ActiveTabsState> {
        self.api.active_tabs_updated()
    }

    async fn load(&self) -> Option<BadgeStates> {
        match self.states.state().await {
            Ok(states) => Some(states),
            Err(err) => {
                error!("Failed to load badge states: {}", err);
                None
            }
        }
    }

    /// Targeted update.  A tab-specific update only renders if the tab is active.
    /// A general update renders every active tab, and the general state.
    async fn update_badge(&self, tab_id: Option<TabId>) {
        let active = match self.api.get_active_tabs().await {
            Ok(tabs) => tabs,
            Err(err) => {
                error!("Failed to query active tabs: {:?}", err);
                return;
            }
        };

        if let Some(id) = tab_id {
            if !active.iter().any(|tab| tab.tab_id == id) {
                trace!("tab {} is not active, skipping badge update", id);
                return;
            }
        }

        let states = match self.load().await {
            Some(states) => states,
            None => return,
        };

        match tab_id {
            Some(id) => self.render_tab(&states, id).await,
            None => {
                let ids: Vec<TabId> = active.iter().map(|tab| tab.tab_id).collect();
                join(
                    self.render_tabs(&states, ids.as_slice()),
                    self.render_general(&states),
                )
                .await;
            }
        }
    }

    async fn render_tabs(&self, states: &BadgeStates, ids: &[TabId]) {
        join_all(ids.iter().map(|id| self.render_tab(states, *id))).await;
    }

    async fn render_tab(&self, states: &BadgeStates, id: TabId) {
        let resolved = resolve(states.settings(), MergeTarget::Tab(id));

        if let Err(err) = self.api.set_state(&resolved, Some(id)).await {
            error!("Failed to set badge state for tab {}: {:?}", id, err);
        }
    }

    async fn render_general(&self, states: &BadgeStates) {
        let resolved = resolve(states.settings(), MergeTarget::General);

        if let Err(err) = self.api.set_state(&resolved, None).await {
            error!("Failed to set general badge state: {:?}", err);
        }
    }
}
