use serde::{Deserialize, Serialize};

/// Ordering key for badge state contributions.  Higher priorities win the merge.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum BadgeStatePriority {
    Low = 0,
    Default = 100,
    High = 200,
}

impl Default for BadgeStatePriority {
    fn default() -> Self {
        BadgeStatePriority::Default
    }
}
