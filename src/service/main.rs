use super::{
    at_risk::AtRiskCipherBadgeService, auth_status::AuthStatusBadgeService,
    autofill::AutofillBadgeService, badge::BadgeService, tab_tracking::TabTrackingService,
};
use crate::prelude::*;

/// Spawns the tab tracker, the badge listener, and the badge updaters.
///
/// Requires the `BrowserResource`, `CipherResource`, `AtRiskCipherResource` and `BadgeService` resources.
pub struct MainService {
    _tabs: TabTrackingService,
    _listen: Lifeline,
    _auth: AuthStatusBadgeService,
    _autofill: AutofillBadgeService,
    _at_risk: AtRiskCipherBadgeService,
}

impl Service for MainService {
    type Bus = BadgeBus;
    type Lifeline = anyhow::Result<Self>;

    fn spawn(bus: &Self::Bus) -> Self::Lifeline {
        debug!("Launching MainService");

        let badge = bus.resource::<BadgeService>()?;
        let _listen = badge.start_listening();

        let _auth = AuthStatusBadgeService::spawn(bus)?;
        let _autofill = AutofillBadgeService::spawn(bus)?;
        let _at_risk = AtRiskCipherBadgeService::spawn(bus)?;
        let _tabs = TabTrackingService::spawn(bus)?;

        Ok(Self {
            _tabs,
            _listen,
            _auth,
            _autofill,
            _at_risk,
        })
    }
}
