//! Global signals, per-instance subscriptions and retry timers.
//!
//! Each widget instance subscribes under its own `InstanceId`, so two
//! instances listening for the same signal never overwrite each other.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};

use log::trace;
use uuid::Uuid;

/// Unique identifier for a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Create a new unique instance ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for a scheduled retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Kinds of global signals a widget can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Resize,
    PointerMove,
    PointerUp,
    TouchMove,
    TouchEnd,
    LayoutReady,
}

/// A global signal with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalEvent {
    /// Viewport resized
    Resize,
    /// Pointer moved anywhere in the viewport
    PointerMove { x: i32 },
    /// Pointer button released anywhere in the viewport
    PointerUp,
    /// First touch point moved
    TouchMove { x: i32 },
    /// Touch ended
    TouchEnd,
    /// Anchors have been laid out and can be measured
    LayoutReady,
}

impl GlobalEvent {
    pub fn signal(&self) -> Signal {
        match self {
            Self::Resize => Signal::Resize,
            Self::PointerMove { .. } => Signal::PointerMove,
            Self::PointerUp => Signal::PointerUp,
            Self::TouchMove { .. } => Signal::TouchMove,
            Self::TouchEnd => Signal::TouchEnd,
            Self::LayoutReady => Signal::LayoutReady,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingRetry {
    instance: InstanceId,
    due: Instant,
}

/// Subscription registry and retry queue shared by a host's instances.
///
/// Hosts embed one of these and delegate the `Environment` subscription and
/// timer methods to it.
#[derive(Debug, Default)]
pub struct Dispatcher {
    listeners: HashMap<Signal, Vec<InstanceId>>,
    retries: BTreeMap<TimerId, PendingRetry>,
    next_timer: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Returns false if it was already subscribed.
    pub fn subscribe(&mut self, instance: InstanceId, signal: Signal) -> bool {
        let listeners = self.listeners.entry(signal).or_default();
        if listeners.contains(&instance) {
            return false;
        }
        trace!("Subscribe {instance} to {signal:?}");
        listeners.push(instance);
        true
    }

    /// Remove a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, instance: InstanceId, signal: Signal) -> bool {
        let Some(listeners) = self.listeners.get_mut(&signal) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|id| *id != instance);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.listeners.remove(&signal);
        }
        if removed {
            trace!("Unsubscribe {instance} from {signal:?}");
        }
        removed
    }

    pub fn is_subscribed(&self, instance: InstanceId, signal: Signal) -> bool {
        self.listeners
            .get(&signal)
            .is_some_and(|listeners| listeners.contains(&instance))
    }

    /// Instances subscribed to `signal`, in subscription order.
    pub fn listeners(&self, signal: Signal) -> Vec<InstanceId> {
        self.listeners.get(&signal).cloned().unwrap_or_default()
    }

    /// Number of signals `instance` is subscribed to.
    pub fn subscription_count(&self, instance: InstanceId) -> usize {
        self.listeners
            .values()
            .filter(|listeners| listeners.contains(&instance))
            .count()
    }

    /// Schedule a retry `delay` after `now`.
    pub fn schedule(&mut self, instance: InstanceId, now: Instant, delay: Duration) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.retries.insert(
            id,
            PendingRetry {
                instance,
                due: now + delay,
            },
        );
        trace!("Scheduled retry {id:?} for {instance} in {delay:?}");
        id
    }

    /// Cancel a pending retry. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, timer: TimerId) -> bool {
        self.retries.remove(&timer).is_some()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.retries.values().map(|retry| retry.due).min()
    }

    /// Remove and return every retry due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(TimerId, InstanceId)> {
        let mut due: Vec<(Instant, TimerId, InstanceId)> = self
            .retries
            .iter()
            .filter(|(_, retry)| retry.due <= now)
            .map(|(id, retry)| (retry.due, *id, retry.instance))
            .collect();
        due.sort();

        for (_, id, _) in &due {
            self.retries.remove(id);
        }

        due.into_iter().map(|(_, id, instance)| (id, instance)).collect()
    }

    /// Number of retries not yet fired.
    pub fn pending_retries(&self) -> usize {
        self.retries.len()
    }

    /// Instances with at least one subscription.
    pub fn instances(&self) -> HashSet<InstanceId> {
        self.listeners.values().flatten().copied().collect()
    }
}
