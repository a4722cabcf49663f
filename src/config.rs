//! Host configuration, loaded from `~/.tab/badge.yml`
use crate::{
    state::settings::BadgeSettingsState,
    storage::{FileStorage, StateProvider},
};
use anyhow::Context;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BadgeConfig {
    pub storage: StorageConfig,
    /// One of off, error, warn, info, debug, or trace
    pub log_level: Option<String>,
    /// Shows the login count on each tab's badge
    pub badge_counter: bool,
    /// The capacity of the tab event channel.  Must be greater than zero.
    pub channel_capacity: usize,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            log_level: None,
            badge_counter: true,
            channel_capacity: 64,
        }
    }
}

impl BadgeConfig {
    pub fn log_level(&self) -> anyhow::Result<Option<LevelFilter>> {
        match self.log_level.as_deref() {
            Some(level) => {
                let level = LevelFilter::from_str(level)
                    .map_err(|_| anyhow::anyhow!("invalid log_level: {}", level))?;
                Ok(Some(level))
            }
            None => Ok(None),
        }
    }

    pub fn settings(&self) -> BadgeSettingsState {
        BadgeSettingsState {
            enable_badge_counter: self.badge_counter,
        }
    }
}

/// Where badge state is kept.  State in memory is lost when the process exits.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    Memory,
    File { dir: Option<PathBuf> },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File { dir: None }
    }
}

impl StorageConfig {
    pub fn provider(&self) -> anyhow::Result<StateProvider> {
        match self {
            StorageConfig::Memory => Ok(StateProvider::memory()),
            StorageConfig::File { dir } => {
                let dir = match dir {
                    Some(dir) => dir.clone(),
                    None => storage_dir()?,
                };

                Ok(StateProvider::new(Arc::new(FileStorage::new(dir))))
            }
        }
    }
}

pub fn dotdir_path() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::home_dir().ok_or_else(|| anyhow::Error::msg("home_dir not found"))?;

    dir.push(".tab");

    Ok(dir)
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    let mut path = dotdir_path()?;
    path.push("badge.yml");
    Ok(path)
}

pub fn badge_log() -> anyhow::Result<PathBuf> {
    let mut path = dotdir_path()?;
    path.push("badge.log");
    Ok(path)
}

pub fn storage_dir() -> anyhow::Result<PathBuf> {
    let mut dir = dotdir_path()?;
    dir.push("badge");
    Ok(dir)
}

pub fn load_config() -> anyhow::Result<BadgeConfig> {
    let path = config_path()?;
    load_config_from(path.as_path())
}

/// Loads the config at the path.  If the file does not exist, the default config is returned.
pub fn load_config_from(path: &Path) -> anyhow::Result<BadgeConfig> {
    if !path.is_file() {
        log::debug!("File {:?} does not exist", path);
        return Ok(BadgeConfig::default());
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse config {:?}", path))?;

    Ok(config)
}
