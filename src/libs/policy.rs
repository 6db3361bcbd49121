//! Lifecycle policy per task category.
//!
//! | Category      | Active  | Grace | Expires after       | Warning lead |
//! |---------------|---------|-------|---------------------|--------------|
//! | daily         | 1 day   | 24h   | end of day + 48h    | 24h          |
//! | weekly        | 7 days  | 24h   | end of day + 192h   | 24h          |
//! | monthly       | 30 days | 24h   | end of day + 744h   | 24h          |
//! | uncategorized | -       | 24h   | created/due + 24h   | 12h          |

use super::task::Category;
use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub active_days: i64,
    pub grace_hours: i64,
    pub warning_lead_hours: i64,
}

impl Policy {
    /// Offset from the end of the creation day to expiration.
    pub fn total_offset(&self) -> Duration {
        Duration::days(self.active_days) + Duration::hours(self.grace_hours)
    }

    pub fn warning_lead(&self) -> Duration {
        Duration::hours(self.warning_lead_hours)
    }

    pub fn grace(&self) -> Duration {
        Duration::hours(self.grace_hours)
    }
}

pub const DAILY: Policy = Policy {
    active_days: 1,
    grace_hours: 24,
    warning_lead_hours: 24,
};

pub const WEEKLY: Policy = Policy {
    active_days: 7,
    grace_hours: 24,
    warning_lead_hours: 24,
};

pub const MONTHLY: Policy = Policy {
    active_days: 30,
    grace_hours: 24,
    warning_lead_hours: 24,
};

/// Uncategorized tasks measure from creation or the due instant, not from
/// a day boundary.
pub const UNCATEGORIZED: Policy = Policy {
    active_days: 0,
    grace_hours: 24,
    warning_lead_hours: 12,
};

pub fn for_category(category: Option<Category>) -> Policy {
    match category {
        Some(Category::Daily) => DAILY,
        Some(Category::Weekly) => WEEKLY,
        Some(Category::Monthly) => MONTHLY,
        None => UNCATEGORIZED,
    }
}

/// Days without a completion before a weekly task with no target weekday resets.
pub const WEEKLY_FALLBACK_DAYS: i64 = 7;
/// Days without a completion before a monthly task with no target day resets.
pub const MONTHLY_FALLBACK_DAYS: i64 = 30;
