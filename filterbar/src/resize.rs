//! Viewport resize subscription.

use log::debug;

use crate::geometry::{GeometryCalculator, GeometrySnapshot};
use crate::host::{Environment, Surface};
use crate::signal::{InstanceId, Signal};

/// Owns the resize subscription for one widget instance.
#[derive(Debug, Clone, Default)]
pub struct ResizeListener {
    active: bool,
    resizes: u64,
}

impl ResizeListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Resize events handled while active.
    pub fn resizes(&self) -> u64 {
        self.resizes
    }

    pub fn activate<E: Environment + ?Sized>(&mut self, instance: InstanceId, env: &mut E) {
        if self.active {
            return;
        }
        env.subscribe(instance, Signal::Resize);
        self.active = true;
    }

    pub fn deactivate<E: Environment + ?Sized>(&mut self, instance: InstanceId, env: &mut E) {
        if !self.active {
            return;
        }
        env.unsubscribe(instance, Signal::Resize);
        self.active = false;
    }

    /// Measure again after a resize. `None` if inactive or the anchors are gone.
    pub fn recompute<H: Surface + Environment + ?Sized>(
        &mut self,
        calculator: &GeometryCalculator,
        host: &H,
    ) -> Option<GeometrySnapshot> {
        if !self.active {
            return None;
        }
        self.resizes += 1;

        let viewport_width = host.viewport_width();
        let geometry = calculator.recompute(host, viewport_width);
        if geometry.is_none() {
            debug!("Resize to {viewport_width} with unmeasurable anchors, keeping geometry");
        }
        geometry
    }
}
