use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt::Display};

/// The browser's identifier for an open tab.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TabId(pub u32);

impl Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The browser's identifier for a window.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct WindowId(pub u32);

/// A tab which is front-most in some browser window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tab {
    pub tab_id: TabId,
    pub url: String,
}

impl Tab {
    pub fn new(tab_id: TabId, url: impl Into<String>) -> Self {
        Self {
            tab_id,
            url: url.into(),
        }
    }
}

/// The latest snapshot of active tabs, one per window.
///
/// Published on the `BadgeBus` by the `TabTrackingService`.  The watch channel replays the
/// latest snapshot to new subscribers.  The default value is empty, and is never published.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveTabsState {
    pub tabs: Vec<Tab>,
}

impl ActiveTabsState {
    /// Builds a snapshot, dropping duplicate tab ids (the first occurrence wins)
    pub fn new(tabs: impl IntoIterator<Item = Tab>) -> Self {
        let mut seen = HashSet::new();
        let tabs = tabs
            .into_iter()
            .filter(|tab| seen.insert(tab.tab_id))
            .collect();

        Self { tabs }
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.iter().any(|tab| tab.tab_id == id)
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.tab_id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = TabId> + '_ {
        self.tabs.iter().map(|tab| tab.tab_id)
    }
}
