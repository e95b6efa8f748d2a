//! Virtual-time scheduler.
//!
//! Turns a sequence of `(delay, data)` items into a channel that emits each
//! item when its cumulative delay has elapsed in wall-clock time. All
//! offsets are measured from one start instant captured when the schedule is
//! created, so per-item latency never accumulates into drift.
//!
//! When the consumer or the runtime falls behind, items whose deadline has
//! already passed are folded into one pending value and emitted together
//! just before the next on-time item (or when the sequence ends). The
//! default fold keeps the newest item.
//!
//! The task ends as soon as the receiver is dropped, even mid-wait.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::trace;

/// Schedule `items`, collapsing late items to the most recent one.
pub fn schedule<I, T>(items: I) -> mpsc::Receiver<T>
where
    I: IntoIterator<Item = (f64, T)>,
    I::IntoIter: Send + 'static,
    T: Send + 'static,
{
    spawn_schedule(items.into_iter(), |_, value| value)
}

/// Schedule `items`, folding late items with `reduce` starting from `init`.
pub fn schedule_with<I, T, F>(items: I, init: T, mut reduce: F) -> mpsc::Receiver<T>
where
    I: IntoIterator<Item = (f64, T)>,
    I::IntoIter: Send + 'static,
    T: Clone + Send + 'static,
    F: FnMut(T, T) -> T + Send + 'static,
{
    spawn_schedule(items.into_iter(), move |pending: Option<T>, value| {
        reduce(pending.unwrap_or_else(|| init.clone()), value)
    })
}

fn spawn_schedule<It, T, F>(items: It, fold: F) -> mpsc::Receiver<T>
where
    It: Iterator<Item = (f64, T)> + Send + 'static,
    T: Send + 'static,
    F: FnMut(Option<T>, T) -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    let start = Instant::now();
    tokio::spawn(run(items, tx, start, fold));
    rx
}

async fn run<It, T, F>(items: It, tx: mpsc::Sender<T>, start: Instant, mut fold: F)
where
    It: Iterator<Item = (f64, T)>,
    F: FnMut(Option<T>, T) -> T,
{
    let mut virtual_time = 0.0f64;
    let mut wall_time = 0.0f64;
    let mut pending: Option<T> = None;

    for (delay, data) in items {
        virtual_time += delay;
        let ahead = virtual_time - wall_time;

        if ahead > 0.0 {
            if let Some(value) = pending.take() {
                if tx.send(value).await.is_err() {
                    return;
                }
            }
            let wait = Duration::try_from_secs_f64(ahead).unwrap_or(Duration::MAX);
            tokio::select! {
                _ = sleep(wait) => {}
                _ = tx.closed() => {
                    trace!("Receiver dropped while waiting");
                    return;
                }
            }
            if tx.send(data).await.is_err() {
                return;
            }
            wall_time = start.elapsed().as_secs_f64();
        } else {
            trace!(behind = -ahead, "Folding late item");
            pending = Some(fold(pending.take(), data));
        }
    }

    if let Some(value) = pending {
        let _ = tx.send(value).await;
    }
}
