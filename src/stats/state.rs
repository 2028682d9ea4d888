//! Engine state: every counter and buffer the statistics are derived from

use super::heatmap::{top_keys, KeyEntry};
use super::ring::BoundedDeque;
use super::rollover::{uptime_day, DailyEntry};
use super::wpm::WpmTracker;
use crate::config::StatsConfig;
use log::info;
use serde::{Deserialize, Serialize};

/// Session counters, present when session tracking is enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SessionState {
    pub keystrokes: u32,
    pub start_time_ms: Option<u64>,
}

/// Mutable ground truth behind the engine lock.
///
/// Optional sections are `None` when the matching feature is disabled.
#[derive(Debug, Clone)]
pub struct StatsState {
    pub(crate) total_keystrokes: u32,
    pub(crate) today_keystrokes: u32,
    pub(crate) yesterday_keystrokes: u32,
    pub(crate) session: Option<SessionState>,
    pub(crate) wpm: Option<WpmTracker>,
    pub(crate) key_counts: Option<Vec<u32>>,
    pub(crate) history: Option<BoundedDeque<DailyEntry>>,
    pub(crate) current_uptime_day: u16,
    pub(crate) last_keystroke_time: Option<u64>,
}

impl StatsState {
    /// Zeroed state with the day index taken from `now_ms`
    pub fn new(config: &StatsConfig, now_ms: u64) -> Self {
        Self {
            total_keystrokes: 0,
            today_keystrokes: 0,
            yesterday_keystrokes: 0,
            session: config
                .enable_session_tracking
                .then(SessionState::default),
            wpm: config.enable_wpm.then(WpmTracker::new),
            key_counts: config
                .enable_key_heatmap
                .then(|| vec![0; config.max_key_positions]),
            history: config
                .enable_daily_history
                .then(|| BoundedDeque::with_capacity(config.daily_history_days)),
            current_uptime_day: uptime_day(now_ms, config.day_rollover_hour),
            last_keystroke_time: None,
        }
    }

    /// Count one key press at `now_ms`.
    ///
    /// Returns true if the press crossed a day boundary.
    pub(crate) fn record_press(
        &mut self,
        position: u32,
        now_ms: u64,
        config: &StatsConfig,
    ) -> bool {
        self.total_keystrokes = self.total_keystrokes.saturating_add(1);
        self.today_keystrokes = self.today_keystrokes.saturating_add(1);

        let idle_ms = self
            .last_keystroke_time
            .map(|last| now_ms.saturating_sub(last));

        if let Some(session) = self.session.as_mut() {
            if idle_ms.is_some_and(|idle| idle > config.session_timeout_ms) {
                info!("Session timeout, resetting session stats");
                session.keystrokes = 0;
                session.start_time_ms = Some(now_ms);
                if let Some(wpm) = self.wpm.as_mut() {
                    wpm.reset_session();
                }
            }
            if session.keystrokes == 0 {
                session.start_time_ms = Some(now_ms);
            }
            session.keystrokes = session.keystrokes.saturating_add(1);
        }

        if let Some(wpm) = self.wpm.as_mut() {
            // idle gaps longer than the session timeout are not typing time
            if let Some(gap) = idle_ms.filter(|gap| *gap <= config.session_timeout_ms) {
                let gap = gap.min(u32::MAX as u64) as u32;
                wpm.total_typing_time_ms = wpm.total_typing_time_ms.saturating_add(gap);
            }
        }

        self.last_keystroke_time = Some(now_ms);

        if let Some(counts) = self.key_counts.as_mut() {
            if let Some(count) = counts.get_mut(position as usize) {
                *count = count.saturating_add(1);
            }
        }

        if let Some(wpm) = self.wpm.as_mut() {
            wpm.record_press(now_ms, config.wpm_window_ms);
            if let Some(SessionState {
                keystrokes,
                start_time_ms: Some(start),
            }) = self.session
            {
                wpm.update_average(keystrokes, now_ms.saturating_sub(start));
            }
        }

        self.check_day_rollover(now_ms, config)
    }

    /// Zero today, yesterday, session, WPM, heatmap and history.
    ///
    /// The lifetime total is only cleared when `reset_total` is set.
    pub(crate) fn reset(&mut self, reset_total: bool, now_ms: u64) {
        if reset_total {
            self.total_keystrokes = 0;
        }
        self.today_keystrokes = 0;
        self.yesterday_keystrokes = 0;

        if let Some(session) = self.session.as_mut() {
            session.keystrokes = 0;
            session.start_time_ms = Some(now_ms);
        }
        if let Some(wpm) = self.wpm.as_mut() {
            wpm.reset();
        }
        if let Some(counts) = self.key_counts.as_mut() {
            counts.iter_mut().for_each(|c| *c = 0);
        }
        if let Some(history) = self.history.as_mut() {
            history.clear();
        }
    }

    pub(crate) fn key_count(&self, position: u32) -> Option<u32> {
        self.key_counts
            .as_ref()
            .and_then(|counts| counts.get(position as usize).copied())
    }

    /// Consistent copy for readers; `save_pending` is filled in by the engine
    pub(crate) fn snapshot(&self, config: &StatsConfig) -> StatsSnapshot {
        StatsSnapshot {
            total_keystrokes: self.total_keystrokes,
            today_keystrokes: self.today_keystrokes,
            yesterday_keystrokes: self.yesterday_keystrokes,
            session: self.session.map(|s| SessionSnapshot {
                keystrokes: s.keystrokes,
                start_time_ms: s.start_time_ms,
            }),
            wpm: self.wpm.as_ref().map(|w| WpmSnapshot {
                current: w.current,
                average: w.average,
                peak: w.peak,
                total_typing_time_ms: w.total_typing_time_ms,
            }),
            heatmap: self.key_counts.as_ref().map(|counts| HeatmapSnapshot {
                top_keys: top_keys(counts, config.top_keys_count),
                key_counts: counts.clone(),
            }),
            daily_stats: self
                .history
                .as_ref()
                .map(|h| h.iter().copied().collect()),
            last_keystroke_time: self.last_keystroke_time,
            current_uptime_day: self.current_uptime_day,
            save_pending: false,
        }
    }
}

/// Session view of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub keystrokes: u32,
    pub start_time_ms: Option<u64>,
}

/// Typing-speed view of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpmSnapshot {
    pub current: u8,
    pub average: u8,
    pub peak: u8,
    /// Active typing time, idle gaps excluded
    pub total_typing_time_ms: u32,
}

/// Heatmap view of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapSnapshot {
    /// Most-pressed positions, highest first
    pub top_keys: Vec<KeyEntry>,
    /// Press count for every tracked position
    pub key_counts: Vec<u32>,
}

/// Immutable copy of the engine state, safe to hand to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_keystrokes: u32,
    pub today_keystrokes: u32,
    pub yesterday_keystrokes: u32,
    pub session: Option<SessionSnapshot>,
    pub wpm: Option<WpmSnapshot>,
    pub heatmap: Option<HeatmapSnapshot>,
    /// Oldest day first
    pub daily_stats: Option<Vec<DailyEntry>>,
    pub last_keystroke_time: Option<u64>,
    pub current_uptime_day: u16,
    pub save_pending: bool,
}
