//! Key transition events and the polling listener that produces them

use super::keymap::key_position;
use crate::stats::Clock;
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::sync::mpsc;
use std::sync::Arc;

/// A physical key changing state, already resolved to a heatmap position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTransition {
    pub position: u32,
    pub pressed: bool,
    /// Monotonic uptime in milliseconds
    pub timestamp_ms: u64,
}

impl KeyTransition {
    pub fn press(position: u32, timestamp_ms: u64) -> Self {
        Self {
            position,
            pressed: true,
            timestamp_ms,
        }
    }

    pub fn release(position: u32, timestamp_ms: u64) -> Self {
        Self {
            position,
            pressed: false,
            timestamp_ms,
        }
    }
}

/// Compare two polls of the pressed-key set and emit the transitions.
///
/// Keys without a table position are skipped.
pub fn diff_keys(
    previous: &[Keycode],
    current: &[Keycode],
    timestamp_ms: u64,
) -> Vec<KeyTransition> {
    let pressed = current
        .iter()
        .filter(|key| !previous.contains(*key))
        .filter_map(|key| key_position(*key))
        .map(|position| KeyTransition::press(position, timestamp_ms));

    let released = previous
        .iter()
        .filter(|key| !current.contains(*key))
        .filter_map(|key| key_position(*key))
        .map(|position| KeyTransition::release(position, timestamp_ms));

    pressed.chain(released).collect()
}

/// Keyboard listener that polls for key state changes
pub struct KeyListener {
    device_state: DeviceState,
    last_keys: Vec<Keycode>,
    clock: Arc<dyn Clock>,
    event_tx: mpsc::Sender<KeyTransition>,
}

impl KeyListener {
    /// Create a listener timestamping events with `clock`
    pub fn new(clock: Arc<dyn Clock>, event_tx: mpsc::Sender<KeyTransition>) -> Self {
        Self {
            device_state: DeviceState::new(),
            last_keys: Vec::new(),
            clock,
            event_tx,
        }
    }

    /// Poll for keyboard state changes.
    /// Returns the number of events sent.
    pub fn poll(&mut self) -> usize {
        let current_keys = self.device_state.get_keys();
        let transitions = diff_keys(&self.last_keys, &current_keys, self.clock.uptime_ms());
        self.last_keys = current_keys;

        transitions
            .into_iter()
            .filter(|t| self.event_tx.send(*t).is_ok())
            .count()
    }
}
