//! Debounced persistence worker
//!
//! Save requests are collapsed: each request pushes the write deadline out to
//! `debounce` from now, so a burst produces one write after it goes quiet.
//! A separate ticker requests a save every `interval` so data is eventually
//! flushed even when nothing else asks.

use super::KvStore;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Debounce and safety-net periods for the save worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTiming {
    pub debounce: Duration,
    pub interval: Duration,
}

/// Single re-armable deadline on a millisecond timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    delay_ms: u64,
    deadline_ms: Option<u64>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline_ms: None,
        }
    }

    /// Cancel any armed deadline and re-arm it `delay` after `now_ms`
    pub fn request(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// True exactly once when the armed deadline has passed
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }
}

enum SaveCommand {
    Schedule,
    Shutdown,
}

/// Save requests issued versus covered by a successful write.
///
/// A write covers only the requests made before its bytes were taken.
#[derive(Debug, Default)]
struct SaveProgress {
    requested: AtomicU64,
    written: AtomicU64,
}

impl SaveProgress {
    fn request(&self) {
        self.requested.fetch_add(1, Ordering::SeqCst);
    }

    /// Generation a write started now would cover
    fn snapshot(&self) -> u64 {
        self.requested.load(Ordering::SeqCst)
    }

    fn mark_written(&self, generation: u64) {
        self.written.fetch_max(generation, Ordering::SeqCst);
    }

    fn is_pending(&self) -> bool {
        self.written.load(Ordering::SeqCst) < self.requested.load(Ordering::SeqCst)
    }
}

/// Owns the store on a worker thread and writes when the debounce expires
pub struct SaveScheduler {
    tx: Sender<SaveCommand>,
    progress: Arc<SaveProgress>,
    worker: Option<JoinHandle<()>>,
    ticker: Option<JoinHandle<()>>,
    ticker_stop: Option<Sender<()>>,
}

impl SaveScheduler {
    /// Start the worker and ticker threads.
    ///
    /// `source` produces the bytes to write each time the debounce fires.
    pub fn spawn<F>(
        mut store: Box<dyn KvStore>,
        key: &'static str,
        timing: SaveTiming,
        source: F,
    ) -> Self
    where
        F: Fn() -> Vec<u8> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SaveCommand>();
        let progress = Arc::new(SaveProgress::default());

        let worker_progress = Arc::clone(&progress);
        let worker = thread::spawn(move || {
            let epoch = Instant::now();
            let now_ms = || epoch.elapsed().as_millis() as u64;
            let mut debouncer = Debouncer::new(timing.debounce.as_millis() as u64);

            let write = |store: &mut Box<dyn KvStore>| {
                let generation = worker_progress.snapshot();
                let bytes = source();
                match store.save(key, &bytes) {
                    Ok(()) => {
                        worker_progress.mark_written(generation);
                        info!("Statistics saved to persistent storage");
                    }
                    // stays pending until the next request or periodic tick
                    Err(e) => error!("Failed to save statistics: {}", e),
                }
            };

            loop {
                let command = match debouncer.deadline() {
                    Some(deadline) => {
                        let wait = deadline.saturating_sub(now_ms());
                        rx.recv_timeout(Duration::from_millis(wait))
                    }
                    None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                };

                match command {
                    Ok(SaveCommand::Schedule) => {
                        debouncer.request(now_ms());
                        debug!("Save scheduled in {} ms", timing.debounce.as_millis());
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if debouncer.poll(now_ms()) {
                            write(&mut store);
                        }
                    }
                    Ok(SaveCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                        if debouncer.is_armed() {
                            write(&mut store);
                        }
                        break;
                    }
                }
            }
        });

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let ticker_tx = tx.clone();
        let ticker_progress = Arc::clone(&progress);
        let ticker = thread::spawn(move || loop {
            match stop_rx.recv_timeout(timing.interval) {
                Err(RecvTimeoutError::Timeout) => {
                    info!("Periodic save triggered");
                    ticker_progress.request();
                    if ticker_tx.send(SaveCommand::Schedule).is_err() {
                        break;
                    }
                }
                _ => break,
            }
        });

        Self {
            tx,
            progress,
            worker: Some(worker),
            ticker: Some(ticker),
            ticker_stop: Some(stop_tx),
        }
    }

    /// Request a save; repeated requests within the debounce collapse into one
    pub fn schedule(&self) {
        self.progress.request();
        if self.tx.send(SaveCommand::Schedule).is_err() {
            warn!("Save worker is gone, dropping save request");
        }
    }

    /// True from a request until a successful write that started after it
    pub fn is_pending(&self) -> bool {
        self.progress.is_pending()
    }
}

impl Drop for SaveScheduler {
    fn drop(&mut self) {
        // stop the ticker first so it cannot enqueue after shutdown
        self.ticker_stop.take();
        if let Some(ticker) = self.ticker.take() {
            let _ = ticker.join();
        }
        let _ = self.tx.send(SaveCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
