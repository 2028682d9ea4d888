//! Integration tests for Keystroke Stats
//!
//! These tests drive the public engine API end to end: key presses through
//! counters, session, WPM, heatmap and rollover, persistence through the
//! stores, and observer dispatch.

use keystroke_stats::config::StatsConfig;
use keystroke_stats::stats::{
    KeystrokeStats, ManualClock, PersistLayout, PersistedSnapshot, Propagation, StatsError,
    StatsObserver, StatsSnapshot, MAX_SUBSCRIBERS, PERSIST_KEY, PERSIST_VERSION,
};
use keystroke_stats::storage::{FileStore, KvStore, MemoryStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const HOUR_MS: u64 = 3_600_000;
const DAY_MS: u64 = 24 * HOUR_MS;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn engine_with(config: StatsConfig) -> KeystrokeStats {
    KeystrokeStats::new(config, Arc::new(ManualClock::new(0))).expect("valid config")
}

fn engine() -> KeystrokeStats {
    engine_with(StatsConfig::default())
}

/// Press every position in `keys` at `step_ms` intervals starting at `start_ms`
fn type_keys(stats: &KeystrokeStats, keys: &[u32], start_ms: u64, step_ms: u64) {
    for (i, &key) in keys.iter().enumerate() {
        stats.handle_keypress(key, true, start_ms + i as u64 * step_ms);
    }
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

#[test]
fn presses_update_counters_and_heatmap() {
    let stats = engine();
    type_keys(&stats, &[5, 5, 7], 1000, 100);

    let snap = stats.snapshot();
    assert_eq!(snap.total_keystrokes, 3);
    assert_eq!(snap.today_keystrokes, 3);
    assert_eq!(snap.session.expect("session enabled").keystrokes, 3);
    assert_eq!(stats.get_key_count(5).expect("in range"), 2);
    assert_eq!(stats.get_key_count(7).expect("in range"), 1);

    let top = snap.heatmap.expect("heatmap enabled").top_keys;
    assert_eq!(top.len(), 10);
    assert_eq!((top[0].position, top[0].count), (5, 2));
    assert_eq!((top[1].position, top[1].count), (7, 1));
}

#[test]
fn releases_do_not_change_state() {
    let stats = engine();
    type_keys(&stats, &[1, 2], 0, 50);
    let before = stats.snapshot();

    for i in 0..20 {
        assert_eq!(stats.handle_keypress(i, false, 200), Propagation::Continue);
    }
    assert_eq!(stats.snapshot(), before);
}

#[test]
fn out_of_range_position_counts_total_only() {
    let stats = engine();
    stats.handle_keypress(5000, true, 10);

    let snap = stats.snapshot();
    assert_eq!(snap.total_keystrokes, 1);
    assert!(snap
        .heatmap
        .expect("heatmap enabled")
        .key_counts
        .iter()
        .all(|&c| c == 0));
    assert!(matches!(
        stats.get_key_count(5000),
        Err(StatsError::InvalidArgument(_))
    ));
}

#[test]
fn disabled_features_are_absent() {
    let stats = engine_with(StatsConfig {
        enable_session_tracking: false,
        enable_wpm: false,
        enable_key_heatmap: false,
        enable_daily_history: false,
        ..StatsConfig::default()
    });
    type_keys(&stats, &[1, 2, 3], 0, 100);

    let snap = stats.snapshot();
    assert_eq!(snap.total_keystrokes, 3);
    assert!(snap.session.is_none());
    assert!(snap.wpm.is_none());
    assert!(snap.heatmap.is_none());
    assert!(snap.daily_stats.is_none());
    assert!(matches!(
        stats.get_key_count(1),
        Err(StatsError::NotSupported(_))
    ));
}

// ---------------------------------------------------------------------------
// Sessions and WPM
// ---------------------------------------------------------------------------

#[test]
fn wpm_is_computed_over_the_window() {
    let stats = engine();
    // 10 presses, 100 ms apart: 10 keystrokes in 900 ms
    type_keys(&stats, &[30; 10], 1000, 100);

    let wpm = stats.snapshot().wpm.expect("wpm enabled");
    // 10 * 60000 / (900 * 5) = 133
    assert_eq!(wpm.current, 133);
    // the second press alone was 2 keys in 100 ms
    assert_eq!(wpm.peak, 240);
    assert_eq!(wpm.average, 133);
}

#[test]
fn idle_gap_starts_a_new_session() {
    let stats = engine();
    type_keys(&stats, &[1, 2, 3], 0, 100);
    stats.handle_keypress(4, true, 200 + 300_001);

    let session = stats.snapshot().session.expect("session enabled");
    assert_eq!(session.keystrokes, 1);
    assert_eq!(session.start_time_ms, Some(300_201));
}

// ---------------------------------------------------------------------------
// Day rollover
// ---------------------------------------------------------------------------

#[test]
fn keypress_past_day_boundary_rolls_over() {
    let stats = engine();
    type_keys(&stats, &[1; 4], 1000, 100);
    // the crossing press is counted before the day closes
    stats.handle_keypress(2, true, DAY_MS + 5);

    let snap = stats.snapshot();
    assert_eq!(snap.yesterday_keystrokes, 5);
    assert_eq!(snap.today_keystrokes, 0);
    assert_eq!(snap.total_keystrokes, 5);
    assert_eq!(snap.current_uptime_day, 1);

    let history = snap.daily_stats.expect("history enabled");
    assert_eq!(history.len(), 1);
    assert_eq!((history[0].day, history[0].keystrokes), (0, 5));

    stats.handle_keypress(2, true, DAY_MS + 100);
    assert_eq!(stats.snapshot().today_keystrokes, 1);
}

#[test]
fn history_keeps_only_the_newest_days() {
    let stats = engine_with(StatsConfig {
        daily_history_days: 3,
        ..StatsConfig::default()
    });
    for day in 0..6u64 {
        stats.handle_keypress(1, true, day * DAY_MS + 10);
    }

    let history = stats.snapshot().daily_stats.expect("history enabled");
    let days: Vec<u16> = history.iter().map(|e| e.day).collect();
    assert_eq!(days, vec![2, 3, 4]);
}

#[test]
fn rollover_hour_shifts_the_boundary() {
    let stats = engine_with(StatsConfig {
        day_rollover_hour: 6,
        ..StatsConfig::default()
    });
    stats.handle_keypress(1, true, 1000);
    // 23h of uptime is still day 0 with a 6h shift
    stats.handle_keypress(1, true, 23 * HOUR_MS);
    assert_eq!(stats.snapshot().current_uptime_day, 0);

    stats.handle_keypress(1, true, 30 * HOUR_MS + 1);
    let snap = stats.snapshot();
    assert_eq!(snap.current_uptime_day, 1);
    assert_eq!(snap.yesterday_keystrokes, 3);
}

#[test]
fn idle_rollover_follows_the_clock() {
    let clock = Arc::new(ManualClock::new(0));
    let stats = KeystrokeStats::new(StatsConfig::default(), clock.clone()).expect("valid config");
    type_keys(&stats, &[1, 1], 10, 10);

    clock.advance(DAY_MS);
    assert!(stats.check_rollover());
    let snap = stats.snapshot();
    assert_eq!(snap.today_keystrokes, 0);
    assert_eq!(snap.yesterday_keystrokes, 2);
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn reset_keeps_total_unless_requested() {
    let stats = engine();
    type_keys(&stats, &[3, 3, 3], 0, 100);
    stats.handle_keypress(3, true, DAY_MS + 1);

    stats.reset(false);
    let snap = stats.snapshot();
    assert_eq!(snap.total_keystrokes, 4);
    assert_eq!(snap.today_keystrokes, 0);
    assert_eq!(snap.yesterday_keystrokes, 0);
    assert_eq!(stats.get_key_count(3).expect("in range"), 0);
    assert!(snap.daily_stats.expect("history enabled").is_empty());

    stats.reset(true);
    assert_eq!(stats.snapshot().total_keystrokes, 0);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn persisted_subset_restores_into_a_new_engine() {
    let source = engine();
    type_keys(&source, &[5, 5, 7], 1000, 100);
    source.handle_keypress(9, true, DAY_MS + 1);
    let bytes = source.persist_bytes();

    let restored = engine();
    restored.load_persisted_bytes(&bytes).expect("compatible blob");

    let (a, b) = (source.snapshot(), restored.snapshot());
    assert_eq!(b.total_keystrokes, a.total_keystrokes);
    assert_eq!(b.today_keystrokes, a.today_keystrokes);
    assert_eq!(b.yesterday_keystrokes, a.yesterday_keystrokes);
    assert_eq!(b.current_uptime_day, a.current_uptime_day);
    assert_eq!(b.daily_stats, a.daily_stats);
    assert_eq!(restored.get_key_count(5).expect("in range"), 2);
    assert_eq!(
        b.wpm.expect("wpm enabled").peak,
        a.wpm.expect("wpm enabled").peak
    );
}

#[test]
fn wrong_version_is_rejected_without_changes() {
    let stats = engine();
    type_keys(&stats, &[1, 2], 0, 100);
    let before = stats.snapshot();

    let mut data = stats.persist_subset();
    data.version = PERSIST_VERSION + 1;
    assert!(matches!(
        stats.load_persist_subset(&data),
        Err(StatsError::VersionMismatch { .. })
    ));
    assert_eq!(stats.snapshot(), before);
}

#[test]
fn blob_for_a_different_layout_is_rejected() {
    let small = engine_with(StatsConfig {
        max_key_positions: 16,
        ..StatsConfig::default()
    });
    let bytes = small.persist_bytes();
    assert_eq!(
        bytes.len(),
        PersistLayout::for_config(small.config()).size()
    );

    let stats = engine();
    assert!(matches!(
        stats.load_persisted_bytes(&bytes),
        Err(StatsError::SizeMismatch { .. })
    ));
    assert!(matches!(
        PersistedSnapshot::from_bytes(&[], &PersistLayout::for_config(stats.config())),
        Err(StatsError::InvalidArgument(_))
    ));
}

#[test]
fn memory_store_sees_one_write_per_burst() {
    let store = MemoryStore::new();
    let stats = KeystrokeStats::with_store(
        StatsConfig {
            save_debounce_ms: 50,
            ..StatsConfig::default()
        },
        Arc::new(ManualClock::new(0)),
        Box::new(store.clone()),
    )
    .expect("valid config");

    type_keys(&stats, &[1; 20], 0, 10);
    assert!(stats.snapshot().save_pending);
    thread::sleep(Duration::from_millis(400));

    assert_eq!(store.writes(), 1);
    assert!(!stats.is_save_pending());
    let blob = store.get(PERSIST_KEY).expect("written");
    assert_eq!(blob, stats.persist_bytes());
}

#[test]
fn file_store_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let stats = KeystrokeStats::with_store(
            StatsConfig::default(),
            Arc::new(ManualClock::new(0)),
            Box::new(FileStore::new(dir.path())),
        )
        .expect("valid config");
        type_keys(&stats, &[30, 30, 31], 0, 100);
        stats.save().expect("save");
    }

    let store = FileStore::new(dir.path());
    assert!(store.load(PERSIST_KEY).expect("readable").is_some());

    let stats = KeystrokeStats::with_store(
        StatsConfig::default(),
        Arc::new(ManualClock::new(0)),
        Box::new(store),
    )
    .expect("valid config");
    assert_eq!(stats.snapshot().total_keystrokes, 3);
    assert_eq!(stats.get_key_count(30).expect("in range"), 2);
}

#[test]
fn longest_history_survives_restart_and_longer_is_refused() {
    let config = StatsConfig {
        daily_history_days: 255,
        ..StatsConfig::default()
    };
    let store = MemoryStore::new();
    {
        let stats = KeystrokeStats::with_store(
            config.clone(),
            Arc::new(ManualClock::new(0)),
            Box::new(store.clone()),
        )
        .expect("valid config");
        for day in 1..=260u64 {
            stats.handle_keypress(1, true, day * DAY_MS);
        }
    }

    let restored = KeystrokeStats::with_store(
        config,
        Arc::new(ManualClock::new(260 * DAY_MS)),
        Box::new(store.clone()),
    )
    .expect("valid config");
    let history = restored.snapshot().daily_stats.expect("history enabled");
    assert_eq!(history.len(), 255);
    assert_eq!(history.first().map(|e| e.day), Some(5));
    assert_eq!(history.last().map(|e| e.day), Some(259));

    let too_long = StatsConfig {
        daily_history_days: 256,
        ..StatsConfig::default()
    };
    assert!(matches!(
        KeystrokeStats::with_store(
            too_long,
            Arc::new(ManualClock::new(0)),
            Box::new(store.clone()),
        ),
        Err(StatsError::Config(_))
    ));
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

struct Recorder {
    id: usize,
    log: Arc<Mutex<Vec<(usize, u32)>>>,
}

impl StatsObserver for Recorder {
    fn on_stats_changed(&self, stats: &StatsSnapshot) {
        if let Ok(mut log) = self.log.lock() {
            log.push((self.id, stats.total_keystrokes));
        }
    }
}

#[test]
fn observers_are_called_in_registration_order() {
    let stats = engine();
    let log = Arc::new(Mutex::new(Vec::new()));
    for id in 0..3 {
        stats
            .register_callback(Arc::new(Recorder {
                id,
                log: Arc::clone(&log),
            }))
            .expect("register");
    }

    stats.handle_keypress(1, true, 10);
    let calls = log.lock().expect("lock").clone();
    assert_eq!(calls, vec![(0, 1), (1, 1), (2, 1)]);
}

#[test]
fn registry_is_bounded_and_unregister_is_exact() {
    let stats = engine();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut handles: Vec<Arc<dyn StatsObserver>> = Vec::new();

    for _ in 0..MAX_SUBSCRIBERS {
        let calls = Arc::clone(&calls);
        let observer: Arc<dyn StatsObserver> = Arc::new(move |_: &StatsSnapshot| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        stats
            .register_callback(Arc::clone(&observer))
            .expect("room left");
        handles.push(observer);
    }

    let extra: Arc<dyn StatsObserver> = Arc::new(|_: &StatsSnapshot| {});
    assert!(matches!(
        stats.register_callback(Arc::clone(&extra)),
        Err(StatsError::CapacityExceeded { .. })
    ));
    assert!(matches!(
        stats.unregister_callback(&extra),
        Err(StatsError::NotFound)
    ));

    stats.unregister_callback(&handles[1]).expect("registered");
    stats.handle_keypress(1, true, 10);
    assert_eq!(calls.load(Ordering::SeqCst), MAX_SUBSCRIBERS - 1);
}

#[test]
fn load_and_reset_notify_observers() {
    let stats = engine();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    stats
        .register_callback(Arc::new(move |_: &StatsSnapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .expect("register");

    let data = stats.persist_subset();
    stats.load_persist_subset(&data).expect("same layout");
    stats.reset(false);
    stats.notify_all();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn concurrent_presses_are_all_counted() {
    let stats = Arc::new(engine());
    let handles: Vec<_> = (0..4u32)
        .map(|t| {
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                for i in 0..250u64 {
                    stats.handle_keypress(t, true, i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread");
    }

    let snap = stats.snapshot();
    assert_eq!(snap.total_keystrokes, 1000);
    assert_eq!(snap.today_keystrokes, 1000);
    for t in 0..4 {
        assert_eq!(stats.get_key_count(t).expect("in range"), 250);
    }
}
