//! Keystroke statistics engine
//!
//! Counts presses, derives words-per-minute, keeps a per-position heatmap,
//! rolls the counters over at uptime-day boundaries and persists a versioned
//! subset of itself through a debounced save worker.

mod clock;
mod engine;
mod error;
mod heatmap;
mod notify;
mod persist;
mod ring;
mod rollover;
mod state;
mod wpm;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::{KeystrokeStats, Propagation};
pub use error::{Result, StatsError};
pub use heatmap::{top_keys, KeyEntry};
pub use notify::{StatsObserver, SubscriberRegistry, MAX_SUBSCRIBERS};
pub use persist::{PersistLayout, PersistedSnapshot, PersistedWpm, PERSIST_KEY, PERSIST_VERSION};
pub use ring::{BoundedDeque, RingBuffer};
pub use rollover::{uptime_day, DailyEntry};
pub use state::{HeatmapSnapshot, SessionSnapshot, StatsSnapshot, WpmSnapshot};
pub use wpm::{words_per_minute, WpmTracker, WPM_WINDOW_SLOTS};
