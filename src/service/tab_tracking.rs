use crate::{
    message::tabs::{TabEvent, TabTransition},
    platform::browser::{query_active_tabs, BrowserPlatform, BrowserResource},
    prelude::*,
    state::tab::ActiveTabsState,
};

/// Tracks the active tab of each window, and publishes ActiveTabsState
///
/// Activations and url updates re-query the browser.  Reloads only re-query if they occur in a tracked tab.
/// A url update in an untracked tab is only published if it changes the snapshot.
pub struct TabTrackingService {
    _events: Lifeline,
}

impl Service for TabTrackingService {
    type Bus = BadgeBus;
    type Lifeline = anyhow::Result<Self>;

    fn spawn(bus: &Self::Bus) -> Self::Lifeline {
        let mut rx = bus.rx::<TabEvent>()?;
        let mut tx = bus.tx::<ActiveTabsState>()?;
        let BrowserResource(platform) = bus.resource::<BrowserResource>()?;

        let _events = Self::try_task("events", async move {
            let mut last = ActiveTabsState::default();

            if let Some(state) = query(platform.as_ref()).await {
                last = state.clone();
                tx.send(state).await?;
            }

            while let Some(event) = rx.recv().await {
                if !requires_query(&event, &last) {
                    continue;
                }

                trace!("querying active tabs after {:?}", &event);
                if let Some(state) = query(platform.as_ref()).await {
                    if state == last && is_untracked_update(&event, &last) {
                        continue;
                    }

                    last = state.clone();
                    tx.send(state).await?;
                }
            }

            Ok(())
        });

        Ok(Self { _events })
    }
}

fn requires_query(event: &TabEvent, last: &ActiveTabsState) -> bool {
    match event {
        TabEvent::Activated { .. } => true,
        // the tab may have been activated before it had a url
        TabEvent::Updated { url: Some(_), .. } => true,
        TabEvent::Committed {
            tab_id,
            transition: TabTransition::Reload,
        } => last.contains(*tab_id),
        _ => false,
    }
}

fn is_untracked_update(event: &TabEvent, last: &ActiveTabsState) -> bool {
    matches!(event, TabEvent::Updated { tab_id, .. } if !last.contains(*tab_id))
}

/// Queries the active tabs.  Empty snapshots are not published.
async fn query(platform: &dyn BrowserPlatform) -> Option<ActiveTabsState> {
    match query_active_tabs(platform).await {
        Ok(state) if state.is_empty() => None,
        Ok(state) => Some(state),
        Err(err) => {
            warn!("failed to query active tabs: {:?}", err);
            None
        }
    }
}
