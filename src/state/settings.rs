use serde::Deserialize;

/// User settings which control the badge updaters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BadgeSettingsState {
    #[serde(default = "default_enable_badge_counter")]
    pub enable_badge_counter: bool,
}

impl Default for BadgeSettingsState {
    fn default() -> Self {
        Self {
            enable_badge_counter: default_enable_badge_counter(),
        }
    }
}

fn default_enable_badge_counter() -> bool {
    true
}
