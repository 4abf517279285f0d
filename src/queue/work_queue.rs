// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deduplicating, rate-limited work queue shared by the event router and the reconcile workers.
//!
//! A key is in at most one of three places: pending in the FIFO, in flight with a worker,
//! or waiting in the delay heap. Adding a key that is already pending is a no-op. Adding a
//! key that is in flight marks it dirty so it is queued again once the worker calls
//! [`WorkQueue::done`]; the same key is therefore never processed by two workers at once.

use crate::queue::rate_limiter::ExponentialBackoff;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

pub struct WorkQueue<K> {
    state: Mutex<State<K>>,
    notify: Notify,
}

struct State<K> {
    queue: VecDeque<K>,
    dirty: HashSet<K>,
    processing: HashSet<K>,
    delayed: BinaryHeap<Delayed<K>>,
    /// Earliest ready time per delayed key, used to drop superseded heap entries
    waiting: HashMap<K, Instant>,
    backoff: ExponentialBackoff<K>,
    shutting_down: bool,
}

struct Delayed<K> {
    ready_at: Instant,
    key: K,
}

// Min-heap on ready time
impl<K> Ord for Delayed<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.ready_at.cmp(&self.ready_at)
    }
}

impl<K> PartialOrd for Delayed<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> PartialEq for Delayed<K> {
    fn eq(&self, other: &Self) -> bool {
        self.ready_at == other.ready_at
    }
}

impl<K> Eq for Delayed<K> {}

impl<K: Eq + Hash + Clone> State<K> {
    fn insert(&mut self, key: K) -> bool {
        if self.dirty.contains(&key) {
            return false;
        }
        self.dirty.insert(key.clone());
        if self.processing.contains(&key) {
            return false;
        }
        self.queue.push_back(key);
        true
    }

    /// Move every delayed key whose ready time has passed into the FIFO
    fn promote_due(&mut self, now: Instant) {
        while self.delayed.peek().is_some_and(|d| d.ready_at <= now) {
            let Some(entry) = self.delayed.pop() else {
                break;
            };
            if self.waiting.get(&entry.key) == Some(&entry.ready_at) {
                self.waiting.remove(&entry.key);
                self.insert(entry.key);
            }
        }
    }
}

impl<K: Eq + Hash + Clone + std::fmt::Debug> WorkQueue<K> {
    pub fn new(backoff: ExponentialBackoff<K>) -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                dirty: HashSet::new(),
                processing: HashSet::new(),
                delayed: BinaryHeap::new(),
                waiting: HashMap::new(),
                backoff,
                shutting_down: false,
            }),
            notify: Notify::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, State<K>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue `key` unless it is already pending
    pub fn add(&self, key: K) {
        let mut state = self.state();
        if state.shutting_down {
            return;
        }
        if state.insert(key) {
            self.notify.notify_waiters();
        }
    }

    /// Enqueue `key` once `delay` has elapsed
    pub fn add_after(&self, key: K, delay: Duration) {
        if delay.is_zero() {
            self.add(key);
            return;
        }

        let mut state = self.state();
        if state.shutting_down {
            return;
        }

        let ready_at = Instant::now() + delay;
        if state.waiting.get(&key).is_some_and(|at| *at <= ready_at) {
            return;
        }
        state.waiting.insert(key.clone(), ready_at);
        state.delayed.push(Delayed { ready_at, key });
        // Wake sleeping workers so they re-arm on the new earliest deadline
        self.notify.notify_waiters();
    }

    /// Re-enqueue `key` after its exponential backoff delay
    pub fn add_rate_limited(&self, key: K) {
        let delay = self.state().backoff.when(&key);
        debug!("Requeueing {:?} in {:?}", key, delay);
        self.add_after(key, delay);
    }

    /// Clear the backoff history of `key` after a successful reconciliation
    pub fn forget(&self, key: &K) {
        self.state().backoff.forget(key);
    }

    pub fn num_requeues(&self, key: &K) -> u32 {
        self.state().backoff.num_requeues(key)
    }

    /// Wait for the next key. Returns `None` once the queue is shut down.
    pub async fn get(&self) -> Option<K> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let next_ready = {
                let mut state = self.state();
                if state.shutting_down {
                    return None;
                }
                state.promote_due(Instant::now());
                if let Some(key) = state.queue.pop_front() {
                    state.dirty.remove(&key);
                    state.processing.insert(key.clone());
                    return Some(key);
                }
                state.delayed.peek().map(|d| d.ready_at)
            };

            match next_ready {
                Some(ready_at) => {
                    tokio::select! {
                        _ = &mut notified => {}
                        _ = sleep_until(ready_at) => {}
                    }
                }
                None => notified.await,
            }
        }
    }

    /// Mark `key` as no longer in flight, queueing it again if it changed meanwhile
    pub fn done(&self, key: &K) {
        let mut state = self.state();
        state.processing.remove(key);
        if state.dirty.contains(key) && !state.shutting_down {
            state.queue.push_back(key.clone());
            self.notify.notify_waiters();
        }
    }

    /// Stop handing out keys. In-flight work is left to finish.
    pub fn shut_down(&self) {
        self.state().shutting_down = true;
        self.notify.notify_waiters();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.state().shutting_down
    }

    /// Number of keys ready to be handed out
    pub fn len(&self) -> usize {
        self.state().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
