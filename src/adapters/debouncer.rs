// Debounced bulk shipper for ancillary records.
//
// Purpose
// - Buffer records and ship them in bulk when either the configured wall-clock
//   interval elapses since the last flush or the buffer reaches the configured
//   maximum, whichever comes first.
//
// Responsibilities
// - add never blocks on a flush: the buffer lock is held only to push, and the
//   bulk is drained under the lock but sent outside it.
// - Flush failures are logged and not retried; they never block later adds.
// - shutdown is the drain hook: it stops the interval worker and flushes
//   whatever is still buffered, so process exit does not drop records.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::core::ports::BulkSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncerConfig {
    /// Wall-clock interval between flushes. Zero disables the interval worker.
    pub min_frequency: Duration,
    /// Buffer size that triggers an immediate flush. Zero disables the
    /// size trigger.
    pub max_bulk_size: usize,
}

struct Shared<R> {
    cfg: DebouncerConfig,
    sink: Arc<dyn BulkSink<R>>,
    cache: Mutex<Vec<R>>,
    kick: Notify,
}

pub struct Debouncer<R: Send + 'static> {
    shared: Arc<Shared<R>>,
    shutdown: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<R: Send + 'static> Debouncer<R> {
    pub fn new(cfg: DebouncerConfig, sink: Arc<dyn BulkSink<R>>) -> Self {
        let shared = Arc::new(Shared {
            cfg,
            sink,
            cache: Mutex::new(Vec::new()),
            kick: Notify::new(),
        });
        let (shutdown, shutdown_rx) = watch::channel(false);
        let worker = if cfg.min_frequency > Duration::ZERO {
            Some(tokio::spawn(run_worker(shared.clone(), shutdown_rx)))
        } else {
            None
        };
        Self {
            shared,
            shutdown,
            worker: Mutex::new(worker),
        }
    }

    /// Buffer one record. A full buffer only signals the worker (or spawns a
    /// one-shot flush when no worker runs); the caller never waits on the
    /// flush itself.
    pub async fn add(&self, record: R) {
        let full = {
            let mut cache = self.shared.cache.lock().await;
            cache.push(record);
            self.shared.cfg.max_bulk_size > 0 && cache.len() >= self.shared.cfg.max_bulk_size
        };
        if full {
            if self.shared.cfg.min_frequency > Duration::ZERO {
                self.shared.kick.notify_one();
            } else {
                let shared = self.shared.clone();
                tokio::spawn(async move { flush(&shared).await });
            }
        }
    }

    /// Drain hook: stop the interval worker and flush the remaining buffer.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        let worker = self.worker.lock().await.take();
        match worker {
            // The worker flushes once more before it exits.
            Some(handle) => {
                let _ = handle.await;
            }
            None => flush(&self.shared).await,
        }
    }
}

async fn run_worker<R: Send + 'static>(shared: Arc<Shared<R>>, mut shutdown: watch::Receiver<bool>) {
    let period = shared.cfg.min_frequency;
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                flush(&shared).await;
            }
            _ = shared.kick.notified() => {
                flush(&shared).await;
                // A size flush restarts the interval.
                ticker.reset();
            }
            _ = shutdown.changed() => {
                flush(&shared).await;
                return;
            }
        }
    }
}

async fn flush<R: Send + 'static>(shared: &Shared<R>) {
    let bulk = {
        let mut cache = shared.cache.lock().await;
        if cache.is_empty() {
            return;
        }
        std::mem::take(&mut *cache)
    };
    let size = bulk.len();
    if let Err(error) = shared.sink.send_bulk(bulk).await {
        tracing::warn!(%error, size, "shipping bulk failed");
    }
}
