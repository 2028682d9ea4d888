//! Log-only consumer for keyboards without a screen

use crate::keyboard::key_label;
use crate::stats::{StatsObserver, StatsSnapshot};
use log::info;

/// Writes every snapshot to the log
#[derive(Debug, Default)]
pub struct HeadlessLogger;

/// Lines the headless logger emits for one snapshot
pub fn summary_lines(stats: &StatsSnapshot) -> Vec<String> {
    let mut lines = vec![format!(
        "Today: {}, Yesterday: {}, Total: {}",
        stats.today_keystrokes, stats.yesterday_keystrokes, stats.total_keystrokes
    )];

    if let Some(session) = &stats.session {
        lines.push(format!("Session: {} keystrokes", session.keystrokes));
    }
    if let Some(wpm) = &stats.wpm {
        lines.push(format!(
            "WPM - Current: {}, Average: {}, Peak: {}",
            wpm.current, wpm.average, wpm.peak
        ));
    }
    if let Some(heatmap) = &stats.heatmap {
        for (rank, entry) in heatmap
            .top_keys
            .iter()
            .filter(|e| e.count > 0)
            .take(3)
            .enumerate()
        {
            lines.push(format!(
                "  #{}: {} (position {}) = {} presses",
                rank + 1,
                key_label(entry.position),
                entry.position,
                entry.count
            ));
        }
    }
    lines
}

impl StatsObserver for HeadlessLogger {
    fn on_stats_changed(&self, stats: &StatsSnapshot) {
        info!("=== Keystroke Statistics ===");
        for line in summary_lines(stats) {
            info!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatsConfig;
    use crate::stats::{KeystrokeStats, ManualClock};
    use std::sync::Arc;

    #[test]
    fn summary_lists_counters_and_top_keys() {
        let stats = KeystrokeStats::new(StatsConfig::default(), Arc::new(ManualClock::new(0)))
            .expect("valid config");
        for pos in [30u32, 30, 57] {
            stats.handle_keypress(pos, true, 100);
        }
        let lines = summary_lines(&stats.snapshot());

        assert_eq!(lines[0], "Today: 3, Yesterday: 0, Total: 3");
        assert_eq!(lines[1], "Session: 3 keystrokes");
        assert!(lines[2].starts_with("WPM - Current:"));
        assert_eq!(lines[3], "  #1: A (position 30) = 2 presses");
        assert_eq!(lines[4], "  #2: Space (position 57) = 1 presses");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn logger_registers_as_observer() {
        let stats = KeystrokeStats::new(StatsConfig::default(), Arc::new(ManualClock::new(0)))
            .expect("valid config");
        stats
            .register_callback(Arc::new(HeadlessLogger))
            .expect("register");
        stats.handle_keypress(1, true, 5);
    }
}
