//! Virtual-time task scheduling.
//!
//! Two kinds of deferred work drive the viewer: keyed timers that
//! debounce (re-scheduling a key replaces its pending timer) and a
//! next-frame queue for DOM work that must wait until after a content
//! reset. Time is a caller-supplied millisecond clock so hosts and tests
//! control it directly.

#[derive(Debug, Clone)]
struct Timer<K, T> {
    key: K,
    deadline: u64,
    seq: u64,
    task: T,
}

/// Keyed timers plus a next-frame queue.
#[derive(Debug, Clone)]
pub struct Scheduler<K, T> {
    timers: Vec<Timer<K, T>>,
    frame: Vec<T>,
    seq: u64,
}

impl<K: PartialEq, T: PartialEq> Scheduler<K, T> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            frame: Vec::new(),
            seq: 0,
        }
    }

    /// Run `task` at `now + delay_ms`, replacing any pending timer under
    /// the same key.
    pub fn schedule(&mut self, key: K, now: u64, delay_ms: u64, task: T) {
        self.timers.retain(|t| t.key != key);
        self.seq += 1;
        self.timers.push(Timer {
            key,
            deadline: now.saturating_add(delay_ms),
            seq: self.seq,
            task,
        });
    }

    /// Drop the pending timer for `key`. Returns whether one existed.
    pub fn cancel(&mut self, key: &K) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.key != *key);
        self.timers.len() != before
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.timers.iter().any(|t| t.key == *key)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Remove and return every task due at `now`, earliest first. Ties keep
    /// scheduling order.
    pub fn take_due(&mut self, now: u64) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.deadline <= now);
        self.timers = pending;
        due.sort_by_key(|t| (t.deadline, t.seq));
        due.into_iter().map(|t| t.task).collect()
    }

    /// Queue `task` for the next frame. A task already queued is not
    /// queued twice.
    pub fn request_frame(&mut self, task: T) {
        if !self.frame.contains(&task) {
            self.frame.push(task);
        }
    }

    pub fn has_frame_work(&self) -> bool {
        !self.frame.is_empty()
    }

    /// Drain the next-frame queue in request order.
    pub fn take_frame(&mut self) -> Vec<T> {
        std::mem::take(&mut self.frame)
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.frame.clear();
    }
}

impl<K: PartialEq, T: PartialEq> Default for Scheduler<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
