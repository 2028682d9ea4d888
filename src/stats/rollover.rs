//! Uptime-day tracking and the rolling daily history

use super::state::StatsState;
use crate::config::StatsConfig;
use log::info;
use serde::{Deserialize, Serialize};

const MS_PER_HOUR: u64 = 3_600_000;
const HOURS_PER_DAY: u64 = 24;

/// Keystrokes recorded on one uptime day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Uptime day index, not a calendar date
    pub day: u16,
    pub keystrokes: u32,
}

/// Day index for `uptime_ms`, shifted back by `rollover_hour` hours.
///
/// Hours before the offset all fall on day 0.
pub fn uptime_day(uptime_ms: u64, rollover_hour: u32) -> u16 {
    let hours = uptime_ms / MS_PER_HOUR;
    let adjusted = hours.saturating_sub(rollover_hour as u64);
    (adjusted / HOURS_PER_DAY).min(u16::MAX as u64) as u16
}

impl StatsState {
    /// Roll today's count into yesterday and the history when the day changes.
    ///
    /// Returns true if a rollover happened. Calling again on the same day is a
    /// no-op.
    pub(crate) fn check_day_rollover(&mut self, now_ms: u64, config: &StatsConfig) -> bool {
        let day = uptime_day(now_ms, config.day_rollover_hour);
        if day == self.current_uptime_day {
            return false;
        }

        info!(
            "Day rollover detected: day {} -> {}",
            self.current_uptime_day, day
        );

        if let Some(history) = self.history.as_mut() {
            history.push_back(DailyEntry {
                day: self.current_uptime_day,
                keystrokes: self.today_keystrokes,
            });
        }

        self.yesterday_keystrokes = self.today_keystrokes;
        self.today_keystrokes = 0;
        self.current_uptime_day = day;
        true
    }
}
