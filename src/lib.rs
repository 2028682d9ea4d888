//! Keystroke Stats - typing statistics for a single keyboard
//!
//! Counts keystrokes (lifetime, today, yesterday), tracks sessions and
//! words-per-minute, keeps a per-key heatmap and a rolling daily history,
//! and persists the durable subset through a debounced key/value store.
//!
//! The engine lives in [`stats`]; [`keyboard`] turns host key state into
//! position-tagged transitions and [`ui`] renders snapshots.

pub mod config;
pub mod keyboard;
pub mod report;
pub mod stats;
pub mod storage;
pub mod ui;

pub use config::Config;
pub use stats::{KeystrokeStats, StatsError, StatsSnapshot};
