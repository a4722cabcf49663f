use crate::state::{
    badge::{BadgeField, RawBadgeState, StateSetting},
    tab::TabId,
};

/// The badge a merge is resolved for
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MergeTarget {
    /// Contexts with no tab.  Only general contributions apply.
    General,
    /// A single tab.  General contributions and the tab's own contributions apply.
    Tab(TabId),
}

impl MergeTarget {
    fn applies(&self, setting: &StateSetting) -> bool {
        match (self, setting.tab_id) {
            (_, None) => true,
            (MergeTarget::Tab(target), Some(id)) => *target == id,
            (MergeTarget::General, Some(_)) => false,
        }
    }
}

/// Resolves the contributions relevant to `target` into a complete badge state.
///
/// Contributions are folded from lowest to highest priority.  For each field,
/// a set value overwrites, an unset value reverts to the default, and a deferred value is skipped.
/// An empty background color is treated as deferred.
/// Equal priorities keep their iteration order, so the later contribution wins.
pub fn resolve<'a>(
    settings: impl IntoIterator<Item = &'a StateSetting>,
    target: MergeTarget,
) -> RawBadgeState {
    let mut settings: Vec<&StateSetting> = settings
        .into_iter()
        .filter(|setting| target.applies(setting))
        .collect();

    // sort_by_key is stable
    settings.sort_by_key(|setting| setting.priority);

    let default = RawBadgeState::default();
    let mut text = Some(default.text);
    let mut background_color = Some(default.background_color);
    let mut icon = Some(default.icon);

    for setting in settings {
        setting.state.text.apply(&mut text);
        // an empty color would suppress the icon when rendered
        match &setting.state.background_color {
            BadgeField::Set(color) if color.is_empty() => {}
            field => field.apply(&mut background_color),
        }
        setting.state.icon.apply(&mut icon);
    }

    let default = RawBadgeState::default();
    RawBadgeState {
        text: text.unwrap_or(default.text),
        background_color: background_color.unwrap_or(default.background_color),
        icon: icon.unwrap_or(default.icon),
    }
}
