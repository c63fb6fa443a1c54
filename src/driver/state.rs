// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Lifecycle states of a bound TMU.

/// Where a device is in its probe/remove lifecycle.
///
/// Probe walks `Uninitialized` through `Ready`; removal walks `Ready`
/// through `Unmapped`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    /// Nothing has been acquired.
    Uninitialized,
    /// The register window is mapped.
    Mapped,
    /// The clock is held and the sensor is registered with its zone.
    Registered,
    /// A cooling actuator is bound to the passive trip.
    Bound,
    /// The clock is running and the monitor is enabled.
    Enabled,
    /// The calibration fuse is being read.
    Calibrating,
    /// Temperatures are being reported.
    Ready,
    /// The cooling actuator has been detached.
    Unbound,
    /// The monitor and its clock are off.
    Disabled,
    /// Every resource has been released.
    Unmapped,
}

impl State {
    /// Returns whether this state belongs to the teardown path.
    pub fn is_teardown(self) -> bool {
        self > Self::Ready
    }
}
