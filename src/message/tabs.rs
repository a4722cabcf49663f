use crate::state::tab::{TabId, WindowId};

/// A tab lifecycle event, as reported by the browser.
///
/// Carried over the `BadgeBus`.
///
/// Usage:
/// - Tx from the host runtime, which forwards browser tab listeners.
/// - Rx into the `TabTrackingService`, which publishes `ActiveTabsState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEvent {
    /// A tab became the active tab of its window
    Activated { tab_id: TabId, window_id: WindowId },
    /// A tab was updated in place.  `url` is present only if the url changed.
    Updated { tab_id: TabId, url: Option<String> },
    /// A navigation was committed in the tab's top frame
    Committed {
        tab_id: TabId,
        transition: TabTransition,
    },
    Removed { tab_id: TabId },
}

/// The cause of a committed navigation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TabTransition {
    Link,
    Typed,
    Reload,
    Other,
}
