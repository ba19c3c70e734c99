//! Deterministic virtual time.
//!
//! The page never reads a wall clock to sequence work. The host advances
//! an [`Instant`] and fires whatever the [`TimerQueue`] reports as due, so
//! every deferred step (enter flips, auto-dismiss, removal, counter frames)
//! happens in a reproducible order.

use std::collections::{BTreeMap, HashMap};
use std::ops::Add;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Milliseconds since the controller started.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Instant(u64);

impl Instant {
    pub const ZERO: Instant = Instant(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    pub fn saturating_since(self, earlier: Instant) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        let millis = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Instant(self.0.saturating_add(millis))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(u64);

/// Something that accepts deferred events.
///
/// Components schedule their own event type; the queue owner converts it
/// into its wider event enum.
pub trait Schedule<E> {
    fn schedule(&mut self, at: Instant, event: E) -> TimerId;
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Pending timers ordered by due time, then by insertion.
#[derive(Debug)]
pub struct TimerQueue<E> {
    next_id: u64,
    pending: BTreeMap<(Instant, TimerId), E>,
    due_at: HashMap<TimerId, Instant>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            due_at: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.keys().next().map(|(at, _)| *at)
    }

    /// Removes and returns the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, E)> {
        let key = *self.pending.keys().next()?;
        if key.0 > now {
            return None;
        }
        let event = self.pending.remove(&key)?;
        self.due_at.remove(&key.1);
        Some((key.0, event))
    }

    pub fn schedule(&mut self, at: Instant, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((at, id), event);
        self.due_at.insert(id, at);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_at.remove(&id) {
            Some(at) => self.pending.remove(&(at, id)).is_some(),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Instant, &E)> {
        self.pending.iter().map(|((at, _), event)| (*at, event))
    }
}

impl<E, T> Schedule<E> for TimerQueue<T>
where
    E: Into<T>,
{
    fn schedule(&mut self, at: Instant, event: E) -> TimerId {
        TimerQueue::schedule(self, at, event.into())
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        TimerQueue::cancel(self, id)
    }
}
