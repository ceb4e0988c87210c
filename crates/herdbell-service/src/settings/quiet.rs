//! Quiet-hour evaluation in the configured timezone.

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use herdbell_entity::notification::CategorySetting;

/// Wall-clock time of day at `now` in `tz`.
fn local_time(now: DateTime<Utc>, tz: Tz) -> NaiveTime {
    now.with_timezone(&tz).time()
}

/// Whether `setting`'s quiet window is active at `now`.
pub fn is_quiet_now(setting: &CategorySetting, now: DateTime<Utc>, tz: Tz) -> bool {
    setting.is_quiet_at(local_time(now, tz))
}
