use super::icon::BadgeIcon;

/// The vault authentication status of the active account
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    LoggedOut,
    Locked,
    Unlocked,
}

impl Default for AuthStatus {
    fn default() -> Self {
        AuthStatus::LoggedOut
    }
}

impl AuthStatus {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, AuthStatus::Unlocked)
    }

    pub fn icon(&self) -> BadgeIcon {
        match self {
            AuthStatus::LoggedOut => BadgeIcon::LoggedOut,
            AuthStatus::Locked => BadgeIcon::Locked,
            AuthStatus::Unlocked => BadgeIcon::Unlocked,
        }
    }
}
