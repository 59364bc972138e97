//! Deferred first initialization.
//!
//! Anchors are only measurable after the host has laid them out. Until then
//! the gate waits, either for a layout-ready signal or by re-checking after a
//! fixed delay. Initialization is one-shot.

use std::time::Duration;

use log::{debug, trace};

use crate::config::Readiness;
use crate::host::Environment;
use crate::signal::{InstanceId, Signal, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Anchors not measured yet. Holds the pending retry when polling.
    Waiting { pending: Option<TimerId> },
    Initialized,
}

impl Default for GateState {
    fn default() -> Self {
        Self::Waiting { pending: None }
    }
}

#[derive(Debug, Clone)]
pub struct InitializationGate {
    state: GateState,
    readiness: Readiness,
    retry_delay: Duration,
    listening: bool,
    deferrals: u32,
}

impl InitializationGate {
    pub fn new(readiness: Readiness, retry_delay: Duration) -> Self {
        Self {
            state: GateState::default(),
            readiness,
            retry_delay,
            listening: false,
            deferrals: 0,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == GateState::Initialized
    }

    /// Retry currently scheduled, if any.
    pub fn pending_retry(&self) -> Option<TimerId> {
        match self.state {
            GateState::Waiting { pending } => pending,
            GateState::Initialized => None,
        }
    }

    /// Number of times initialization has been deferred.
    pub fn deferrals(&self) -> u32 {
        self.deferrals
    }

    /// Strategy in effect for this host. Falls back to polling when the host
    /// cannot notify.
    pub fn strategy<E: Environment + ?Sized>(&self, env: &E) -> Readiness {
        match self.readiness {
            Readiness::Notify if env.supports_layout_notifications() => Readiness::Notify,
            _ => Readiness::Poll,
        }
    }

    /// Subscribe to layout notifications if they will be used.
    pub fn activate<E: Environment + ?Sized>(&mut self, instance: InstanceId, env: &mut E) {
        if self.is_initialized() || self.listening {
            return;
        }
        if self.strategy(env) == Readiness::Notify {
            env.subscribe(instance, Signal::LayoutReady);
            self.listening = true;
        }
    }

    /// Anchors were not measurable. Arrange for another check.
    pub fn defer<E: Environment + ?Sized>(&mut self, instance: InstanceId, env: &mut E) {
        let GateState::Waiting { pending } = self.state else {
            return;
        };
        self.deferrals += 1;

        match self.strategy(env) {
            Readiness::Notify => {
                trace!("Initialization of {instance} waiting for layout");
            }
            Readiness::Poll => {
                if pending.is_some() {
                    trace!("Initialization of {instance} already has a retry pending");
                    return;
                }
                let timer = env.schedule_retry(instance, self.retry_delay);
                debug!(
                    "Initialization of {instance} deferred, retry {timer:?} in {:?}",
                    self.retry_delay
                );
                self.state = GateState::Waiting {
                    pending: Some(timer),
                };
            }
        }
    }

    /// Consume a fired retry. Returns false if it is not the one we scheduled.
    pub fn take_retry(&mut self, timer: TimerId) -> bool {
        match self.state {
            GateState::Waiting {
                pending: Some(pending),
            } if pending == timer => {
                self.state = GateState::Waiting { pending: None };
                true
            }
            _ => false,
        }
    }

    /// Mark initialization done and drop whatever was waiting for it.
    pub fn complete<E: Environment + ?Sized>(&mut self, instance: InstanceId, env: &mut E) {
        if self.is_initialized() {
            return;
        }
        self.release(instance, env);
        self.state = GateState::Initialized;
        debug!("{instance} initialized after {} deferrals", self.deferrals);
    }

    /// Cancel the pending retry and layout subscription without initializing.
    pub fn deactivate<E: Environment + ?Sized>(&mut self, instance: InstanceId, env: &mut E) {
        self.release(instance, env);
    }

    fn release<E: Environment + ?Sized>(&mut self, instance: InstanceId, env: &mut E) {
        if let GateState::Waiting {
            pending: Some(timer),
        } = self.state
        {
            env.cancel_retry(timer);
            self.state = GateState::Waiting { pending: None };
        }
        if self.listening {
            env.unsubscribe(instance, Signal::LayoutReady);
            self.listening = false;
        }
    }
}
