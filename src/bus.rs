use crate::{
    message::tabs::TabEvent,
    platform::{
        browser::BrowserResource,
        cipher::{AtRiskCipherResource, CipherResource},
    },
    prelude::*,
    service::badge::BadgeService,
    state::{auth::AuthStatus, settings::BadgeSettingsState, tab::ActiveTabsState},
    storage::StateProvider,
};
use postage::{broadcast, watch};

lifeline_bus!(pub struct BadgeBus);

impl Message<BadgeBus> for TabEvent {
    type Channel = broadcast::Sender<Self>;
}

/// Watch replays the latest snapshot to every subscriber, including late subscribers.
impl Message<BadgeBus> for ActiveTabsState {
    type Channel = watch::Sender<Self>;
}

impl Message<BadgeBus> for AuthStatus {
    type Channel = watch::Sender<Self>;
}

impl Message<BadgeBus> for BadgeSettingsState {
    type Channel = watch::Sender<Self>;
}

impl Resource<BadgeBus> for BrowserResource {}
impl Resource<BadgeBus> for CipherResource {}
impl Resource<BadgeBus> for AtRiskCipherResource {}
impl Resource<BadgeBus> for StateProvider {}
impl Resource<BadgeBus> for BadgeService {}
