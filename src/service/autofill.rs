use crate::{
    platform::cipher::{CipherCounter, CipherResource},
    prelude::*,
    service::badge::BadgeService,
    state::{
        auth::AuthStatus,
        badge::BadgeState,
        priority::BadgeStatePriority,
        settings::BadgeSettingsState,
        tab::{ActiveTabsState, Tab, TabId},
    },
};
use std::sync::Arc;

const STATE_PREFIX: &str = "autofill-badge-";

/// Shows the number of matching logins on each active tab.
///
/// Counts are only shown while the vault is unlocked, and the badge counter is enabled.
pub struct AutofillBadgeService {
    _update: Lifeline,
}

impl Service for AutofillBadgeService {
    type Bus = BadgeBus;
    type Lifeline = anyhow::Result<Self>;

    fn spawn(bus: &Self::Bus) -> Self::Lifeline {
        let mut rx_tabs = bus.rx::<ActiveTabsState>()?;
        let mut rx_auth = bus.rx::<AuthStatus>()?;
        let mut rx_settings = bus.rx::<BadgeSettingsState>()?;

        let badge = bus.resource::<BadgeService>()?;
        let CipherResource(ciphers) = bus.resource::<CipherResource>()?;

        let _update = Self::task("update", async move {
            let updater = AutofillUpdater { badge, ciphers };

            let mut tabs = ActiveTabsState::default();
            let mut auth = AuthStatus::default();
            let mut settings = BadgeSettingsState::default();

            loop {
                tokio::select! {
                    Some(next) = rx_tabs.recv() => tabs = next,
                    Some(next) = rx_auth.recv() => auth = next,
                    Some(next) = rx_settings.recv() => settings = next,
                    else => break,
                }

                updater.update(&tabs, auth, &settings).await;
            }
        });

        Ok(Self { _update })
    }
}

struct AutofillUpdater {
    badge: BadgeService,
    ciphers: Arc<dyn CipherCounter>,
}

impl AutofillUpdater {
    async fn update(&self, tabs: &ActiveTabsState, auth: AuthStatus, settings: &BadgeSettingsState) {
        if !auth.is_unlocked() || !settings.enable_badge_counter {
            self.clear_all().await;
            return;
        }

        self.clear_closed().await;

        for tab in tabs.tabs.iter() {
            self.update_tab(tab).await;
        }
    }

    async fn update_tab(&self, tab: &Tab) {
        let count = match self.ciphers.count_for_url(tab.url.as_str()).await {
            Ok(count) => count,
            Err(err) => {
                warn!("failed to count logins for tab {}: {:?}", tab.tab_id, err);
                return;
            }
        };

        let name = state_name(tab.tab_id);
        match count_text(count) {
            Some(text) => {
                let state = BadgeState::default().with_text(text);
                self.badge
                    .set_state(&name, BadgeStatePriority::Default, state, Some(tab.tab_id))
                    .await;
            }
            None => self.badge.clear_state(&name).await,
        }
    }

    async fn clear_all(&self) {
        for name in self.badge.names().await {
            if parse_state_name(&name).is_some() {
                self.badge.clear_state(&name).await;
            }
        }
    }

    async fn clear_closed(&self) {
        let open = match self.badge.get_tabs().await {
            Ok(open) => open,
            Err(err) => {
                warn!("failed to query open tabs: {:?}", err);
                return;
            }
        };

        for name in self.badge.names().await {
            match parse_state_name(&name) {
                Some(id) if !open.contains(&id) => {
                    debug!("tab {} was closed, clearing its login count", id);
                    self.badge.clear_state(&name).await;
                }
                _ => {}
            }
        }
    }
}

fn state_name(tab_id: TabId) -> String {
    format!("{}{}", STATE_PREFIX, tab_id)
}

fn parse_state_name(name: &str) -> Option<TabId> {
    name.strip_prefix(STATE_PREFIX)?.parse().ok().map(TabId)
}

/// The badge text for a login count.  Large counts are abbreviated, and zero shows nothing.
pub fn count_text(count: usize) -> Option<String> {
    match count {
        0 => None,
        1..=9 => Some(count.to_string()),
        _ => Some("9+".to_string()),
    }
}
