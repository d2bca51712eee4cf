// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, thread-safe buffer decoupling the message source from the
//! analysis workers.
//!
//! Strict FIFO: the live view and the CSV export must reflect chat
//! chronology. On `close()`, `dequeue` drains the remaining items before
//! returning the closed-sentinel (`None`); no message enqueued before
//! close is lost.

use std::collections::VecDeque;
use std::pin::pin;

use moodwire_core::{Message, MoodwireError, OverflowPolicy};
use tokio::sync::{Mutex, Notify};
use tracing::{debug, warn};

struct QueueInner {
    buf: VecDeque<Message>,
    closed: bool,
}

/// The ingestion queue between producer and worker pool.
///
/// Capacity `None` means unbounded, with a high-water warning to flag an
/// unthrottled source. Bounded queues apply the configured
/// [`OverflowPolicy`] when full: `Block` (producer backpressure, the
/// default), `DropOldest`, or `Reject`.
pub struct IngestionQueue {
    inner: Mutex<QueueInner>,
    /// Signalled when an item is pushed.
    items: Notify,
    /// Signalled when space frees in a bounded queue.
    space: Notify,
    capacity: Option<usize>,
    policy: OverflowPolicy,
    high_water: usize,
}

impl IngestionQueue {
    pub fn new(capacity: Option<usize>, policy: OverflowPolicy, high_water: usize) -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                buf: VecDeque::new(),
                closed: false,
            }),
            items: Notify::new(),
            space: Notify::new(),
            capacity,
            policy,
            high_water,
        }
    }

    /// Convenience constructor: unbounded queue with the given warning
    /// threshold.
    pub fn unbounded(high_water: usize) -> Self {
        Self::new(None, OverflowPolicy::Block, high_water)
    }

    /// Enqueues a message.
    ///
    /// Under the `Block` policy this suspends while a bounded queue is
    /// full. `DropOldest` evicts the front instead. `Reject` returns
    /// [`MoodwireError::QueueFull`]. After [`close`](Self::close), always
    /// returns [`MoodwireError::QueueClosed`].
    pub async fn enqueue(&self, msg: Message) -> Result<(), MoodwireError> {
        let mut msg = Some(msg);
        loop {
            // Register interest in `space` while still holding the lock, so
            // a wake-up between the capacity check and the await below is
            // never lost.
            let mut space = pin!(self.space.notified());
            {
                let mut inner = self.inner.lock().await;
                if inner.closed {
                    return Err(MoodwireError::QueueClosed);
                }

                let full = self
                    .capacity
                    .is_some_and(|cap| inner.buf.len() >= cap);
                if full {
                    match self.policy {
                        OverflowPolicy::Block => {
                            space.as_mut().enable();
                            // fall through to the wait below
                        }
                        OverflowPolicy::DropOldest => {
                            if let Some(dropped) = inner.buf.pop_front() {
                                warn!(
                                    message_id = dropped.id,
                                    "queue full, evicting oldest message"
                                );
                            }
                            inner.buf.push_back(msg.take().expect("message consumed twice"));
                            drop(inner);
                            self.items.notify_one();
                            return Ok(());
                        }
                        OverflowPolicy::Reject => {
                            return Err(MoodwireError::QueueFull {
                                capacity: self.capacity.unwrap_or(0),
                            });
                        }
                    }
                } else {
                    inner.buf.push_back(msg.take().expect("message consumed twice"));
                    let depth = inner.buf.len();
                    drop(inner);
                    if self.capacity.is_none() && depth == self.high_water {
                        warn!(
                            depth,
                            "ingestion queue reached high-water mark; analysis is not keeping up"
                        );
                    }
                    self.items.notify_one();
                    return Ok(());
                }
            }
            space.await;
        }
    }

    /// Removes and returns the oldest message, suspending while the queue
    /// is empty. Returns `None` once the queue is closed and fully drained.
    pub async fn dequeue(&self) -> Option<Message> {
        loop {
            let mut items = pin!(self.items.notified());
            {
                let mut inner = self.inner.lock().await;
                if let Some(msg) = inner.buf.pop_front() {
                    drop(inner);
                    self.space.notify_one();
                    return Some(msg);
                }
                if inner.closed {
                    return None;
                }
                // Same lost-wakeup guard as `enqueue`: register before
                // releasing the lock.
                items.as_mut().enable();
            }
            items.await;
        }
    }

    /// Stops admission. Queued messages remain dequeueable; blocked
    /// enqueuers and idle dequeuers are woken.
    pub async fn close(&self) {
        {
            let mut inner = self.inner.lock().await;
            if inner.closed {
                return;
            }
            inner.closed = true;
            debug!(remaining = inner.buf.len(), "ingestion queue closed");
        }
        self.items.notify_waiters();
        self.space.notify_waiters();
    }

    /// Current queue depth.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.buf.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.buf.is_empty()
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.closed
    }
}
