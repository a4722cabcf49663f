//! Aggregates badge state contributions from extension features, and renders the merged result onto each active tab.
//!
//! Hosts provide a `BrowserPlatform`, a `CipherCounter` and an `AtRiskCipherSource`, call `spawn`, and forward browser events
//! through the returned `BadgeRuntime`.
use crate::prelude::*;

use config::BadgeConfig;
use lifeline::dyn_bus::DynBus;
use message::tabs::TabEvent;
use platform::{
    badge_api::DefaultBadgeBrowserApi,
    browser::{BrowserPlatform, BrowserResource},
    cipher::{AtRiskCipherResource, AtRiskCipherSource, CipherCounter, CipherResource},
};
use postage::{broadcast, watch};
use service::{badge::BadgeService, main::MainService};
use state::{auth::AuthStatus, settings::BadgeSettingsState};
use std::sync::Arc;

pub mod bus;
pub mod config;
pub mod log;
pub mod message;
pub mod platform;
mod prelude;
pub mod service;
pub mod state;
pub mod storage;

/// The host's handle to the running badge services.  Dropping it stops the services.
pub struct BadgeRuntime {
    pub badge: BadgeService,
    pub tx_events: broadcast::Sender<TabEvent>,
    pub tx_auth: watch::Sender<AuthStatus>,
    pub tx_settings: watch::Sender<BadgeSettingsState>,
    _main: MainService,
}

/// Builds a bus carrying the platform resources, the state store, and the badge aggregator
pub fn new_bus(
    config: &BadgeConfig,
    platform: Arc<dyn BrowserPlatform>,
    ciphers: Arc<dyn CipherCounter>,
    at_risk: Arc<dyn AtRiskCipherSource>,
) -> anyhow::Result<BadgeBus> {
    if config.channel_capacity == 0 {
        return Err(anyhow::anyhow!("channel_capacity must be greater than zero"));
    }

    let bus = BadgeBus::default();
    bus.capacity::<TabEvent>(config.channel_capacity)?;

    bus.store_resource(BrowserResource(platform));
    bus.store_resource(CipherResource(ciphers));
    bus.store_resource(AtRiskCipherResource(at_risk));

    let provider = config.storage.provider()?;
    bus.store_resource(provider.clone());

    let api = DefaultBadgeBrowserApi::from_bus(&bus)?;
    bus.store_resource(BadgeService::new(&provider, Arc::new(api)));

    Ok(bus)
}

pub async fn spawn(
    config: &BadgeConfig,
    platform: Arc<dyn BrowserPlatform>,
    ciphers: Arc<dyn CipherCounter>,
    at_risk: Arc<dyn AtRiskCipherSource>,
) -> anyhow::Result<BadgeRuntime> {
    let bus = new_bus(config, platform, ciphers, at_risk)?;

    let mut tx_settings = bus.tx::<BadgeSettingsState>()?;
    tx_settings.send(config.settings()).await?;

    let tx_auth = bus.tx::<AuthStatus>()?;
    let tx_events = bus.tx::<TabEvent>()?;

    info!("Launching MainService");
    let _main = MainService::spawn(&bus)?;
    let badge = bus.resource::<BadgeService>()?;

    Ok(BadgeRuntime {
        badge,
        tx_events,
        tx_auth,
        tx_settings,
        _main,
    })
}

/// Applies the configured log level, and logs to stderr and `~/.tab/badge.log`
pub fn init_logging(config: &BadgeConfig) -> anyhow::Result<()> {
    if let Some(level) = config.log_level()? {
        crate::log::set_level(level);
    }

    let log_file = config::badge_log()?;
    crate::log::init(Some(log_file.as_path()))
}
