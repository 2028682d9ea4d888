//! Bounded subscriber registry for change notifications

use super::error::{Result, StatsError};
use super::state::StatsSnapshot;
use std::sync::Arc;

/// Maximum number of registered observers
pub const MAX_SUBSCRIBERS: usize = 4;

/// Receives a snapshot whenever the statistics change.
///
/// Called synchronously on whichever thread caused the change, so
/// implementations must be quick and must not block.
pub trait StatsObserver: Send + Sync {
    fn on_stats_changed(&self, stats: &StatsSnapshot);
}

impl<F> StatsObserver for F
where
    F: Fn(&StatsSnapshot) + Send + Sync,
{
    fn on_stats_changed(&self, stats: &StatsSnapshot) {
        self(stats)
    }
}

/// Observers in registration order
#[derive(Default)]
pub struct SubscriberRegistry {
    observers: Vec<Arc<dyn StatsObserver>>,
}

fn same_observer(a: &Arc<dyn StatsObserver>, b: &Arc<dyn StatsObserver>) -> bool {
    // compare data pointers only; vtable addresses are not unique
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            observers: Vec::with_capacity(MAX_SUBSCRIBERS),
        }
    }

    pub fn register(&mut self, observer: Arc<dyn StatsObserver>) -> Result<()> {
        if self.observers.len() >= MAX_SUBSCRIBERS {
            return Err(StatsError::CapacityExceeded {
                capacity: MAX_SUBSCRIBERS,
            });
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Remove the first registration of `observer`, keeping the others in order
    pub fn unregister(&mut self, observer: &Arc<dyn StatsObserver>) -> Result<()> {
        let index = self
            .observers
            .iter()
            .position(|o| same_observer(o, observer))
            .ok_or(StatsError::NotFound)?;
        self.observers.remove(index);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Clone the current list so callbacks can run without holding any lock
    pub fn observers(&self) -> Vec<Arc<dyn StatsObserver>> {
        self.observers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn observer() -> Arc<dyn StatsObserver> {
        Arc::new(|_: &StatsSnapshot| {})
    }

    #[test]
    fn fifth_registration_fails() {
        let mut registry = SubscriberRegistry::new();
        for _ in 0..MAX_SUBSCRIBERS {
            registry.register(observer()).expect("room left");
        }
        let err = registry.register(observer()).unwrap_err();
        assert!(matches!(err, StatsError::CapacityExceeded { capacity: 4 }));
    }

    #[test]
    fn unregister_frees_a_slot() {
        let mut registry = SubscriberRegistry::new();
        let second = observer();
        registry.register(observer()).expect("register");
        registry.register(second.clone()).expect("register");
        registry.register(observer()).expect("register");
        registry.register(observer()).expect("register");

        registry.unregister(&second).expect("registered");
        assert_eq!(registry.len(), 3);
        registry.register(observer()).expect("slot freed");
    }

    #[test]
    fn unregister_unknown_is_not_found() {
        let mut registry = SubscriberRegistry::new();
        registry.register(observer()).expect("register");
        assert!(matches!(
            registry.unregister(&observer()),
            Err(StatsError::NotFound)
        ));
    }

    #[test]
    fn order_is_preserved_after_removal() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let make = |tag: u8| -> Arc<dyn StatsObserver> {
            let calls = Arc::clone(&calls);
            Arc::new(move |_: &StatsSnapshot| calls.lock().unwrap().push(tag))
        };

        let mut registry = SubscriberRegistry::new();
        let (a, b, c) = (make(1), make(2), make(3));
        registry.register(a).expect("register");
        registry.register(b.clone()).expect("register");
        registry.register(c).expect("register");
        registry.unregister(&b).expect("registered");

        let snapshot = StatsSnapshot {
            total_keystrokes: 0,
            today_keystrokes: 0,
            yesterday_keystrokes: 0,
            session: None,
            wpm: None,
            heatmap: None,
            daily_stats: None,
            last_keystroke_time: None,
            current_uptime_day: 0,
            save_pending: false,
        };
        for o in registry.observers() {
            o.on_stats_changed(&snapshot);
        }
        assert_eq!(*calls.lock().unwrap(), vec![1, 3]);
    }
}
