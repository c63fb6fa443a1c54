// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Release bookkeeping for partially-bound devices.
//!
//! Every resource the probe path acquires is recorded as a [`Release`] step
//! in an [`Unwind`] list. Whether probe fails halfway or a fully-bound
//! device is removed, the same list drives the release, so the two paths
//! cannot disagree about what needs undoing.

use arrayvec::ArrayVec;

/// A single release action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Release {
    /// Unmap the register window.
    Unmap,
    /// Unregister the sensor from its zone.
    UnregisterSensor,
    /// Unregister the cooling actuator.
    UnregisterCooling,
    /// Unbind the cooling actuator from the passive trip.
    UnbindCooling,
    /// Gate the input clock.
    DisableClock,
    /// Clear the hardware enable bit.
    ClearEnable,
    /// Withdraw the zone from hardware monitoring.
    RemoveHwmon,
}

impl Release {
    /// Returns whether this step detaches the cooling actuator.
    ///
    /// These steps run ahead of everything else, so that the host can never
    /// drive a cooling actuator off a sensor whose clock is gated.
    pub fn detaches_cooling(self) -> bool {
        matches!(self, Self::UnbindCooling | Self::UnregisterCooling)
    }
}

const MAX_STEPS: usize = 7;

/// An ordered list of pending [`Release`] steps.
#[derive(Clone, Debug, Default)]
pub struct Unwind {
    steps: ArrayVec<Release, MAX_STEPS>,
}

impl Unwind {
    /// Creates an empty `Unwind`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `step` will be needed to undo an acquisition.
    ///
    /// # Panics
    ///
    /// Panics if `step` is already pending.
    pub fn push(&mut self, step: Release) {
        assert!(!self.contains(step), "{:?} pushed twice", step);
        self.steps.push(step);
    }

    /// Returns whether `step` is pending.
    pub fn contains(&self, step: Release) -> bool {
        self.steps.contains(&step)
    }

    /// Returns whether no steps are pending.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Removes every pending step, returning them in execution order.
    ///
    /// Cooling-actuator steps come first, most recent first; the remaining
    /// steps follow, also most recent first.
    pub fn drain(&mut self) -> impl Iterator<Item = Release> {
        let mut ordered = ArrayVec::<Release, MAX_STEPS>::new();
        ordered.extend(
            self.steps.iter().rev().copied().filter(|s| s.detaches_cooling()),
        );
        ordered.extend(
            self.steps.iter().rev().copied().filter(|s| !s.detaches_cooling()),
        );
        self.steps.clear();
        ordered.into_iter()
    }
}
