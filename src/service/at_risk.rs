use crate::{
    platform::cipher::{AtRiskCipherResource, AtRiskCipherSource},
    prelude::*,
    service::badge::BadgeService,
    state::{
        auth::AuthStatus,
        badge::BadgeState,
        icon::BadgeIcon,
        priority::BadgeStatePriority,
        tab::{ActiveTabsState, Tab, TabId},
    },
};
use std::sync::Arc;

const STATE_PREFIX: &str = "at-risk-cipher-badge-";

/// Flags active tabs whose page has at-risk logins, while the vault is unlocked.
///
/// The flag is registered at high priority, so it overrides the status icon.
pub struct AtRiskCipherBadgeService {
    _update: Lifeline,
}

impl Service for AtRiskCipherBadgeService {
    type Bus = BadgeBus;
    type Lifeline = anyhow::Result<Self>;

    fn spawn(bus: &Self::Bus) -> Self::Lifeline {
        let mut rx_tabs = bus.rx::<ActiveTabsState>()?;
        let mut rx_auth = bus.rx::<AuthStatus>()?;

        let badge = bus.resource::<BadgeService>()?;
        let AtRiskCipherResource(source) = bus.resource::<AtRiskCipherResource>()?;

        let _update = Self::task("update", async move {
            let updater = AtRiskUpdater { badge, source };

            let mut tabs = ActiveTabsState::default();
            let mut auth = AuthStatus::default();

            loop {
                tokio::select! {
                    Some(next) = rx_tabs.recv() => tabs = next,
                    Some(next) = rx_auth.recv() => auth = next,
                    else => break,
                }

                if auth.is_unlocked() {
                    updater.update(&tabs).await;
                } else {
                    updater.clear_all().await;
                }
            }
        });

        Ok(Self { _update })
    }
}

struct AtRiskUpdater {
    badge: BadgeService,
    source: Arc<dyn AtRiskCipherSource>,
}

impl AtRiskUpdater {
    async fn update(&self, tabs: &ActiveTabsState) {
        self.clear_closed().await;

        for tab in tabs.tabs.iter() {
            self.update_tab(tab).await;
        }
    }

    async fn update_tab(&self, tab: &Tab) {
        let at_risk = match self.source.has_at_risk_logins(tab.url.as_str()).await {
            Ok(at_risk) => at_risk,
            Err(err) => {
                warn!("failed to check at-risk logins for tab {}: {:?}", tab.tab_id, err);
                return;
            }
        };

        let name = state_name(tab.tab_id);
        if at_risk {
            let state = BadgeState::default().with_icon(BadgeIcon::AtRisk);
            self.badge
                .set_state(&name, BadgeStatePriority::High, state, Some(tab.tab_id))
                .await;
        } else {
            self.badge.clear_state(&name).await;
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
                    debug!("tab {} was closed, clearing its at-risk flag", id);
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
