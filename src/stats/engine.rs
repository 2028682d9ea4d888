//! The keystroke statistics engine
//!
//! One explicitly constructed object owns the state and the subscriber list
//! behind a single lock. Key presses come in through
//! [`KeystrokeStats::handle_keypress`]; every read path takes the same lock
//! for a consistent view. Persistence and observer callbacks always run after
//! the lock is released.

use super::clock::Clock;
use super::error::{Result, StatsError};
use super::notify::{StatsObserver, SubscriberRegistry};
use super::persist::{PersistLayout, PersistedSnapshot, PERSIST_KEY};
use super::state::{StatsSnapshot, StatsState};
use crate::config::StatsConfig;
use crate::storage::{KvStore, SaveScheduler, SaveTiming};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// What the event source should do with a key event after the engine saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Pass the event on to the next listener
    Continue,
}

/// Everything guarded by the engine lock
struct Core {
    stats: StatsState,
    subscribers: SubscriberRegistry,
}

/// State and config shared with the save worker
struct Shared {
    config: StatsConfig,
    layout: PersistLayout,
    core: Mutex<Core>,
}

impl Shared {
    fn persist_subset(&self) -> PersistedSnapshot {
        self.core.lock().stats.persist_subset()
    }
}

/// Keystroke counters, WPM, heatmap and daily history for one keyboard
pub struct KeystrokeStats {
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    saver: Option<SaveScheduler>,
}

impl KeystrokeStats {
    /// Engine without persistence. `save()` is accepted and ignored.
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: StatsConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let stats = StatsState::new(&config, clock.uptime_ms());
        info!(
            "Initializing keystroke statistics (uptime day {})",
            stats.current_uptime_day
        );

        Ok(Self {
            shared: Arc::new(Shared {
                layout: PersistLayout::for_config(&config),
                config,
                core: Mutex::new(Core {
                    stats,
                    subscribers: SubscriberRegistry::new(),
                }),
            }),
            clock,
            saver: None,
        })
    }

    /// Engine backed by `store`.
    ///
    /// Persisted statistics are loaded first; unreadable or incompatible data
    /// is logged and the engine starts fresh. The save worker starts after the
    /// load so restoring never triggers a write.
    pub fn with_store(
        config: StatsConfig,
        clock: Arc<dyn Clock>,
        store: Box<dyn KvStore>,
    ) -> Result<Self> {
        let mut engine = Self::new(config, clock)?;

        match store.load(PERSIST_KEY) {
            Ok(Some(bytes)) => {
                if let Err(e) = engine.load_persisted_bytes(&bytes) {
                    warn!("Failed to load persisted statistics: {} (starting fresh)", e);
                }
            }
            Ok(None) => info!("No persisted statistics found"),
            Err(e) => warn!("Failed to read persisted statistics: {} (starting fresh)", e),
        }

        let timing = SaveTiming {
            debounce: Duration::from_millis(engine.shared.config.save_debounce_ms),
            interval: Duration::from_millis(engine.shared.config.save_interval_ms),
        };
        let shared = Arc::clone(&engine.shared);
        engine.saver = Some(SaveScheduler::spawn(store, PERSIST_KEY, timing, move || {
            shared.persist_subset().to_bytes(&shared.layout)
        }));

        info!(
            "Keystroke statistics initialized (save every {} ms, debounce {} ms)",
            timing.interval.as_millis(),
            timing.debounce.as_millis()
        );
        Ok(engine)
    }

    pub fn config(&self) -> &StatsConfig {
        &self.shared.config
    }

    /// Record a key transition. Releases are ignored.
    ///
    /// `timestamp_ms` is monotonic uptime and drives session, WPM and day
    /// rollover. The event is never consumed.
    pub fn handle_keypress(&self, position: u32, pressed: bool, timestamp_ms: u64) -> Propagation {
        if !pressed {
            return Propagation::Continue;
        }

        let (total, today) = {
            let mut core = self.shared.core.lock();
            core.stats
                .record_press(position, timestamp_ms, &self.shared.config);
            (core.stats.total_keystrokes, core.stats.today_keystrokes)
        };

        self.schedule_save();
        self.notify_all();

        debug!("Keystroke recorded: total={}, today={}", total, today);
        Propagation::Continue
    }

    /// Roll the day over if the clock has crossed a boundary since the last check.
    ///
    /// Key presses already do this; hosts call it on a timer so an idle
    /// keyboard still rolls over.
    pub fn check_rollover(&self) -> bool {
        let now = self.clock.uptime_ms();
        let rolled = self
            .shared
            .core
            .lock()
            .stats
            .check_day_rollover(now, &self.shared.config);
        if rolled {
            self.schedule_save();
            self.notify_all();
        }
        rolled
    }

    /// Consistent copy of the current statistics
    pub fn snapshot(&self) -> StatsSnapshot {
        let core = self.shared.core.lock();
        self.snapshot_locked(&core)
    }

    fn snapshot_locked(&self, core: &Core) -> StatsSnapshot {
        let mut snapshot = core.stats.snapshot(&self.shared.config);
        snapshot.save_pending = self.is_save_pending();
        snapshot
    }

    /// Press count for one key position
    pub fn get_key_count(&self, position: u32) -> Result<u32> {
        if !self.shared.config.enable_key_heatmap {
            return Err(StatsError::NotSupported("heatmap"));
        }
        self.shared.core.lock().stats.key_count(position).ok_or_else(|| {
            StatsError::InvalidArgument(format!(
                "key position {} out of range (max {})",
                position, self.shared.config.max_key_positions
            ))
        })
    }

    /// The durable subset of the state, tagged with the schema version
    pub fn persist_subset(&self) -> PersistedSnapshot {
        self.shared.persist_subset()
    }

    /// Encoded form of [`Self::persist_subset`]
    pub fn persist_bytes(&self) -> Vec<u8> {
        self.persist_subset().to_bytes(&self.shared.layout)
    }

    /// Restore persisted statistics and notify observers.
    ///
    /// On a version mismatch the current state is kept.
    pub fn load_persist_subset(&self, data: &PersistedSnapshot) -> Result<()> {
        {
            let mut core = self.shared.core.lock();
            if let Err(e) = core.stats.load_persisted(data) {
                warn!("Ignoring persisted statistics: {}", e);
                return Err(e);
            }
            info!(
                "Persisted statistics loaded: total={}, today={}, yesterday={}",
                core.stats.total_keystrokes,
                core.stats.today_keystrokes,
                core.stats.yesterday_keystrokes
            );
        }
        self.notify_all();
        Ok(())
    }

    /// Decode a stored blob and restore it
    pub fn load_persisted_bytes(&self, bytes: &[u8]) -> Result<()> {
        let data = PersistedSnapshot::from_bytes(bytes, &self.shared.layout)?;
        self.load_persist_subset(&data)
    }

    /// Request a debounced write of the persisted subset
    pub fn save(&self) -> Result<()> {
        self.schedule_save();
        Ok(())
    }

    /// Zero the statistics; the lifetime total only if `reset_total`
    pub fn reset(&self, reset_total: bool) {
        warn!("Resetting statistics (reset_total={})", reset_total);
        let now = self.clock.uptime_ms();
        self.shared.core.lock().stats.reset(reset_total, now);
        self.schedule_save();
        self.notify_all();
    }

    pub fn register_callback(&self, observer: Arc<dyn StatsObserver>) -> Result<()> {
        let mut core = self.shared.core.lock();
        core.subscribers.register(observer)?;
        info!("Callback registered ({} total)", core.subscribers.len());
        Ok(())
    }

    pub fn unregister_callback(&self, observer: &Arc<dyn StatsObserver>) -> Result<()> {
        self.shared.core.lock().subscribers.unregister(observer)?;
        info!("Callback unregistered");
        Ok(())
    }

    /// Hand one snapshot to every observer, in registration order.
    ///
    /// The observer list and the snapshot are taken together under the lock;
    /// callbacks run after it is released, so they may call back into the
    /// engine.
    pub fn notify_all(&self) {
        let (observers, snapshot) = {
            let core = self.shared.core.lock();
            if core.subscribers.is_empty() {
                return;
            }
            (core.subscribers.observers(), self.snapshot_locked(&core))
        };
        for observer in observers {
            observer.on_stats_changed(&snapshot);
        }
    }

    pub fn is_save_pending(&self) -> bool {
        self.saver.as_ref().is_some_and(SaveScheduler::is_pending)
    }

    fn schedule_save(&self) {
        if let Some(saver) = &self.saver {
            saver.schedule();
        }
    }
}
