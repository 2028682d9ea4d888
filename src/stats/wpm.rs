//! Sliding-window words-per-minute calculation
//!
//! A word is five keystrokes. The window holds the last ten presses; only
//! those within the configured duration of "now" contribute.

use super::ring::RingBuffer;

/// Number of presses kept in the rate window
pub const WPM_WINDOW_SLOTS: usize = 10;

const MS_PER_MINUTE: u64 = 60_000;
const CHARS_PER_WORD: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowSample {
    timestamp_ms: u64,
    count: u32,
}

/// Words per minute for `keystrokes` typed over `elapsed_ms`, clamped to u8.
///
/// Zero elapsed time or zero keystrokes yields 0.
pub fn words_per_minute(keystrokes: u64, elapsed_ms: u64) -> u8 {
    if elapsed_ms == 0 || keystrokes == 0 {
        return 0;
    }
    let wpm = keystrokes.saturating_mul(MS_PER_MINUTE) / elapsed_ms.saturating_mul(CHARS_PER_WORD);
    wpm.min(u8::MAX as u64) as u8
}

/// WPM counters plus the rate window they are derived from
#[derive(Debug, Clone, Default)]
pub struct WpmTracker {
    pub current: u8,
    pub average: u8,
    pub peak: u8,
    pub total_typing_time_ms: u32,
    window: RingBuffer<WindowSample, WPM_WINDOW_SLOTS>,
}

impl WpmTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press at `now_ms` and recompute current and peak WPM
    pub fn record_press(&mut self, now_ms: u64, window_ms: u64) {
        self.window.push(WindowSample {
            timestamp_ms: now_ms,
            count: 1,
        });

        let mut keystrokes: u64 = 0;
        let mut oldest = now_ms;
        for sample in self.window.iter() {
            if now_ms.saturating_sub(sample.timestamp_ms) <= window_ms {
                keystrokes += sample.count as u64;
                oldest = oldest.min(sample.timestamp_ms);
            }
        }

        self.current = words_per_minute(keystrokes, now_ms - oldest);
        self.peak = self.peak.max(self.current);
    }

    /// Recompute the session average from session totals
    pub fn update_average(&mut self, session_keystrokes: u32, session_duration_ms: u64) {
        if session_keystrokes > 0 && session_duration_ms > 0 {
            self.average = words_per_minute(session_keystrokes as u64, session_duration_ms);
        }
    }

    /// Forget session-scoped rate state after an idle timeout
    pub fn reset_session(&mut self) {
        self.average = 0;
        self.peak = 0;
        self.window.clear();
    }

    /// Zero everything, including accumulated typing time
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn window_head(&self) -> usize {
        self.window.head()
    }
}
