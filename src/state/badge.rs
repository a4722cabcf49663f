use super::{
    icon::{BadgeIcon, IconPaths},
    priority::BadgeStatePriority,
    tab::TabId,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#294e5f";

/// One field of a partial badge state.
///
/// `Defer` leaves the field to lower-priority contributions.
/// `Unset` forces the field back to its default, overriding lower-priority values.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum BadgeField<T> {
    Defer,
    Set(T),
    Unset,
}

impl<T> Default for BadgeField<T> {
    fn default() -> Self {
        BadgeField::Defer
    }
}

impl<T> BadgeField<T> {
    pub fn is_defer(&self) -> bool {
        matches!(self, BadgeField::Defer)
    }

    /// Applies this field on top of a running merge value.
    /// `None` in the running value means the default will be used.
    pub(crate) fn apply(&self, running: &mut Option<T>)
    where
        T: Clone,
    {
        match self {
            BadgeField::Defer => {}
            BadgeField::Set(value) => *running = Some(value.clone()),
            BadgeField::Unset => *running = None,
        }
    }
}

/// A partial badge state, as contributed by a feature service.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BadgeState {
    #[serde(default, skip_serializing_if = "BadgeField::is_defer")]
    pub text: BadgeField<String>,
    #[serde(default, skip_serializing_if = "BadgeField::is_defer")]
    pub background_color: BadgeField<String>,
    #[serde(default, skip_serializing_if = "BadgeField::is_defer")]
    pub icon: BadgeField<IconPaths>,
}

impl BadgeState {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = BadgeField::Set(text.into());
        self
    }

    /// An empty color is ignored when contributions are merged, and falls back to lower priorities.
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = BadgeField::Set(color.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<IconPaths>) -> Self {
        self.icon = BadgeField::Set(icon.into());
        self
    }
}

/// A fully resolved badge state, ready to be rendered.
///
/// The `Default` value is the floor every merge falls back to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RawBadgeState {
    pub text: String,
    pub background_color: String,
    pub icon: IconPaths,
}

impl Default for RawBadgeState {
    fn default() -> Self {
        Self {
            text: "".to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            icon: BadgeIcon::LoggedOut.paths(),
        }
    }
}

/// A registered contribution.  Contributions without a tab id apply to every tab, and the general state.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StateSetting {
    pub priority: BadgeStatePriority,
    pub state: BadgeState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<TabId>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
struct NamedStateSetting {
    name: String,
    setting: StateSetting,
}

/// The named contribution mapping.
///
/// Names keep the position of their first insertion, and re-registering a name replaces its setting.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct BadgeStates {
    entries: Vec<NamedStateSetting>,
}

impl BadgeStates {
    /// Inserts or replaces the named setting, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, setting: StateSetting) -> Option<StateSetting> {
        let name = name.into();

        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => Some(std::mem::replace(&mut entry.setting, setting)),
            None => {
                self.entries.push(NamedStateSetting { name, setting });
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<StateSetting> {
        let index = self.entries.iter().position(|entry| entry.name == name)?;
        Some(self.entries.remove(index).setting)
    }

    pub fn get(&self, name: &str) -> Option<&StateSetting> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.setting)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn settings(&self) -> impl Iterator<Item = &StateSetting> {
        self.entries.iter().map(|entry| &entry.setting)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
