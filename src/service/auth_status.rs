use crate::{
    prelude::*,
    service::badge::BadgeService,
    state::{auth::AuthStatus, badge::BadgeState, priority::BadgeStatePriority},
};

pub const AUTH_STATUS_STATE: &str = "auth-status";

/// Shows the vault lock status as the badge icon, for every tab.
pub struct AuthStatusBadgeService {
    _status: Lifeline,
}

impl Service for AuthStatusBadgeService {
    type Bus = BadgeBus;
    type Lifeline = anyhow::Result<Self>;

    fn spawn(bus: &Self::Bus) -> Self::Lifeline {
        let mut rx = bus.rx::<AuthStatus>()?;
        let badge = bus.resource::<BadgeService>()?;

        let _status = Self::task("status", async move {
            let mut last = None;

            while let Some(status) = rx.recv().await {
                if last == Some(status) {
                    continue;
                }

                debug!("auth status: {:?}", status);
                let state = BadgeState::default().with_icon(status.icon());
                badge
                    .set_state(AUTH_STATUS_STATE, BadgeStatePriority::Low, state, None)
                    .await;

                last = Some(status);
            }
        });

        Ok(Self { _status })
    }
}
