use serde::{Deserialize, Serialize};

/// The toolbar icon variants shipped with the extension
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum BadgeIcon {
    LoggedOut,
    Locked,
    Unlocked,
    /// Shown on pages with at-risk logins
    AtRisk,
}

impl BadgeIcon {
    fn suffix(&self) -> &'static str {
        match self {
            BadgeIcon::LoggedOut => "_gray",
            BadgeIcon::Locked => "_locked",
            BadgeIcon::Unlocked => "",
            BadgeIcon::AtRisk => "_at_risk",
        }
    }

    pub fn paths(&self) -> IconPaths {
        let suffix = self.suffix();

        IconPaths {
            size19: format!("images/icon19{}.png", suffix),
            size38: format!("images/icon38{}.png", suffix),
        }
    }
}

/// Image paths for each toolbar icon size
#[derive(Serialize, Deserialize, Clone, Debug, Hash, PartialEq, Eq)]
pub struct IconPaths {
    pub size19: String,
    pub size38: String,
}

impl From<BadgeIcon> for IconPaths {
    fn from(icon: BadgeIcon) -> Self {
        icon.paths()
    }
}
