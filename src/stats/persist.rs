//! Versioned persisted subset of the engine state
//!
//! Binary format (little-endian), fixed size for a given configuration:
//! - version: 1 byte
//! - total, today, yesterday: 3 × u32
//! - current uptime day: u16
//! - WPM section (if enabled): peak u8, typing time u32
//! - heatmap section (if enabled): `max_key_positions` × u32
//! - history section (if enabled): `daily_history_days` × (day u16, keystrokes u32), count u8

use super::error::{Result, StatsError};
use super::rollover::DailyEntry;
use super::state::StatsState;
use crate::config::StatsConfig;

/// Schema version written into every blob
pub const PERSIST_VERSION: u8 = 1;

/// Store key the blob is saved under
pub const PERSIST_KEY: &str = "keystroke_stats/data";

const HEADER_LEN: usize = 1 + 4 * 3 + 2;
const WPM_LEN: usize = 1 + 4;
const HISTORY_ENTRY_LEN: usize = 2 + 4;

/// WPM fields that survive restarts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistedWpm {
    pub peak_wpm: u8,
    pub total_typing_time_ms: u32,
}

/// The durable subset of the engine state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSnapshot {
    pub version: u8,
    pub total_keystrokes: u32,
    pub today_keystrokes: u32,
    pub yesterday_keystrokes: u32,
    pub current_uptime_day: u16,
    pub wpm: Option<PersistedWpm>,
    pub key_counts: Option<Vec<u32>>,
    /// Oldest day first
    pub daily_history: Option<Vec<DailyEntry>>,
}

/// Which sections a blob carries, and how large they are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistLayout {
    pub wpm: bool,
    pub key_positions: Option<usize>,
    pub history_capacity: Option<usize>,
}

impl PersistLayout {
    pub fn for_config(config: &StatsConfig) -> Self {
        Self {
            wpm: config.enable_wpm,
            key_positions: config
                .enable_key_heatmap
                .then_some(config.max_key_positions),
            history_capacity: config
                .enable_daily_history
                .then_some(config.daily_history_days),
        }
    }

    /// Encoded size in bytes
    pub fn size(&self) -> usize {
        let mut size = HEADER_LEN;
        if self.wpm {
            size += WPM_LEN;
        }
        if let Some(positions) = self.key_positions {
            size += positions * 4;
        }
        if let Some(capacity) = self.history_capacity {
            size += capacity * HISTORY_ENTRY_LEN + 1;
        }
        size
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        buf
    }

    fn u8(&mut self) -> u8 {
        u8::from_le_bytes(self.take())
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }
}

impl PersistedSnapshot {
    /// Encode into the fixed layout. Missing or short sections are zero-filled.
    pub fn to_bytes(&self, layout: &PersistLayout) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(layout.size());
        bytes.push(self.version);
        bytes.extend_from_slice(&self.total_keystrokes.to_le_bytes());
        bytes.extend_from_slice(&self.today_keystrokes.to_le_bytes());
        bytes.extend_from_slice(&self.yesterday_keystrokes.to_le_bytes());
        bytes.extend_from_slice(&self.current_uptime_day.to_le_bytes());

        if layout.wpm {
            let wpm = self.wpm.unwrap_or_default();
            bytes.push(wpm.peak_wpm);
            bytes.extend_from_slice(&wpm.total_typing_time_ms.to_le_bytes());
        }

        if let Some(positions) = layout.key_positions {
            let counts = self.key_counts.as_deref().unwrap_or(&[]);
            for i in 0..positions {
                let count = counts.get(i).copied().unwrap_or(0);
                bytes.extend_from_slice(&count.to_le_bytes());
            }
        }

        if let Some(capacity) = layout.history_capacity {
            let history = self.daily_history.as_deref().unwrap_or(&[]);
            let used = history.len().min(capacity);
            for i in 0..capacity {
                let entry = history.get(i).filter(|_| i < used).copied().unwrap_or_default();
                bytes.extend_from_slice(&entry.day.to_le_bytes());
                bytes.extend_from_slice(&entry.keystrokes.to_le_bytes());
            }
            bytes.push(used.min(u8::MAX as usize) as u8);
        }

        bytes
    }

    /// Decode a blob written with `layout`.
    ///
    /// The version byte is checked before anything else is read.
    pub fn from_bytes(bytes: &[u8], layout: &PersistLayout) -> Result<Self> {
        let version = *bytes
            .first()
            .ok_or_else(|| StatsError::InvalidArgument("empty persisted data".to_string()))?;
        if version != PERSIST_VERSION {
            return Err(StatsError::VersionMismatch {
                found: version,
                expected: PERSIST_VERSION,
            });
        }
        if bytes.len() != layout.size() {
            return Err(StatsError::SizeMismatch {
                expected: layout.size(),
                actual: bytes.len(),
            });
        }

        let mut reader = Reader { bytes, offset: 1 };
        let total_keystrokes = reader.u32();
        let today_keystrokes = reader.u32();
        let yesterday_keystrokes = reader.u32();
        let current_uptime_day = reader.u16();

        let wpm = layout.wpm.then(|| PersistedWpm {
            peak_wpm: reader.u8(),
            total_typing_time_ms: reader.u32(),
        });

        let key_counts = layout
            .key_positions
            .map(|positions| (0..positions).map(|_| reader.u32()).collect::<Vec<_>>());

        let daily_history = match layout.history_capacity {
            Some(capacity) => {
                let entries: Vec<DailyEntry> = (0..capacity)
                    .map(|_| DailyEntry {
                        day: reader.u16(),
                        keystrokes: reader.u32(),
                    })
                    .collect();
                let count = reader.u8() as usize;
                if count > capacity {
                    return Err(StatsError::InvalidArgument(format!(
                        "history count {} exceeds capacity {}",
                        count, capacity
                    )));
                }
                Some(entries.into_iter().take(count).collect())
            }
            None => None,
        };

        Ok(Self {
            version,
            total_keystrokes,
            today_keystrokes,
            yesterday_keystrokes,
            current_uptime_day,
            wpm,
            key_counts,
            daily_history,
        })
    }
}

impl StatsState {
    pub(crate) fn persist_subset(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            version: PERSIST_VERSION,
            total_keystrokes: self.total_keystrokes,
            today_keystrokes: self.today_keystrokes,
            yesterday_keystrokes: self.yesterday_keystrokes,
            current_uptime_day: self.current_uptime_day,
            wpm: self.wpm.as_ref().map(|w| PersistedWpm {
                peak_wpm: w.peak,
                total_typing_time_ms: w.total_typing_time_ms,
            }),
            key_counts: self.key_counts.clone(),
            daily_history: self.history.as_ref().map(|h| h.iter().copied().collect()),
        }
    }

    /// Restore persisted fields. Nothing is touched unless the data validates.
    pub(crate) fn load_persisted(&mut self, data: &PersistedSnapshot) -> Result<()> {
        if data.version != PERSIST_VERSION {
            return Err(StatsError::VersionMismatch {
                found: data.version,
                expected: PERSIST_VERSION,
            });
        }
        if let (Some(current), Some(loaded)) = (&self.key_counts, &data.key_counts) {
            if current.len() != loaded.len() {
                return Err(StatsError::InvalidArgument(format!(
                    "heatmap has {} positions, persisted data has {}",
                    current.len(),
                    loaded.len()
                )));
            }
        }
        if let (Some(history), Some(loaded)) = (&self.history, &data.daily_history) {
            if loaded.len() > history.capacity() {
                return Err(StatsError::InvalidArgument(format!(
                    "persisted history has {} entries, capacity is {}",
                    loaded.len(),
                    history.capacity()
                )));
            }
        }

        self.total_keystrokes = data.total_keystrokes;
        self.today_keystrokes = data.today_keystrokes;
        self.yesterday_keystrokes = data.yesterday_keystrokes;
        self.current_uptime_day = data.current_uptime_day;

        if let (Some(wpm), Some(loaded)) = (self.wpm.as_mut(), data.wpm) {
            wpm.peak = loaded.peak_wpm;
            wpm.total_typing_time_ms = loaded.total_typing_time_ms;
        }
        if let (Some(counts), Some(loaded)) = (self.key_counts.as_mut(), &data.key_counts) {
            counts.copy_from_slice(loaded);
        }
        if let (Some(history), Some(loaded)) = (self.history.as_mut(), &data.daily_history) {
            history.clear();
            for entry in loaded {
                history.push_back(*entry);
            }
        }
        Ok(())
    }
}
