//! Main application state and logic

use crate::config::Config;
use crate::keyboard::KeyTransition;
use crate::report::StatsReport;
use crate::stats::{KeystrokeStats, StatsSnapshot};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// Dashboard application
pub struct App {
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    /// Statistics engine fed by the key listener
    pub stats: Arc<KeystrokeStats>,
    /// Whether the help panel replaces the statistics
    pub show_help: bool,
    /// Application start time
    pub start_time: Instant,
    /// Key transitions seen, presses and releases
    pub total_events: u64,
    /// Last status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl App {
    pub fn new(config: Config, stats: Arc<KeystrokeStats>) -> Self {
        Self {
            state: AppState::Running,
            config,
            stats,
            show_help: false,
            start_time: Instant::now(),
            total_events: 0,
            status_message: None,
            status_time: None,
        }
    }

    /// Forward a key transition to the engine
    pub fn process_event(&mut self, event: &KeyTransition) {
        self.total_events += 1;
        self.stats
            .handle_keypress(event.position, event.pressed, event.timestamp_ms);
    }

    /// Called once per frame
    pub fn tick(&mut self) {
        if self.stats.check_rollover() {
            self.set_status("New day started".to_string());
        }
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Request a save of the statistics
    pub fn save(&mut self) {
        match self.stats.save() {
            Ok(()) => self.set_status("Save scheduled".to_string()),
            Err(e) => self.set_status(format!("Save failed: {}", e)),
        }
    }

    /// Zero today, yesterday, session, WPM, heatmap and history
    pub fn reset_today(&mut self) {
        self.stats.reset(false);
        self.set_status("Statistics reset (total kept)".to_string());
    }

    /// Zero everything including the lifetime total
    pub fn reset_all(&mut self) {
        self.stats.reset(true);
        self.set_status("All statistics reset".to_string());
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still valid (within 3 seconds)
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed().as_secs() < 3 => Some(msg),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Get elapsed time formatted
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let hours = secs / 3600;
        let mins = (secs / 60) % 60;
        let secs = secs % 60;
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, mins, secs)
        } else {
            format!("{:02}:{:02}", mins, secs)
        }
    }

    pub fn generate_report(&self) -> StatsReport {
        StatsReport::new(self.snapshot(), self.start_time.elapsed().as_secs_f64())
    }

    /// Export a statistics report to a JSON file
    pub fn export_report(&mut self, path: &Path) -> Result<String, std::io::Error> {
        let result = self.generate_report().export_json(path);
        let msg = match &result {
            Ok(()) => format!("Exported to {}", path.display()),
            Err(e) => format!("Export failed: {}", e),
        };
        self.set_status(msg.clone());
        result.map(|()| msg)
    }
}
