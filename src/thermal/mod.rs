// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Host thermal-framework interfaces.
//!
//! The host owns thermal zones, trip points, and governors. This driver
//! plugs a sensor into a zone through [`ThermalHost`], and in turn exposes
//! the [`SensorOps`] callbacks that the host's governor polls. Cooling
//! actuators are handed out by a [`CoolingFramework`] and attached to a
//! zone's trip points with [`Zone::bind_cooling()`].
//!
//! All temperatures are in millidegrees Celsius.

use crate::errno::Errno;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(test)]
pub(crate) mod fake;

/// The kind of a trip point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TripKind {
    /// Crossing this trip engages gradual throttling through the bound
    /// cooling actuator.
    Passive,
    /// Crossing this trip triggers the host's emergency action, such as an
    /// orderly shutdown.
    Critical,
}

/// A configured temperature threshold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trip {
    /// What happens when the threshold is crossed.
    pub kind: TripKind,
    /// The threshold, in millidegrees.
    pub temperature: i32,
}

/// The coarse direction a zone's temperature is heading in, relative to a
/// trip point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Trend {
    /// Throttle as hard as possible.
    RaiseFull,
    /// Release throttling entirely.
    DropFull,
}

/// A bound on the cooling states a trip may select.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Limit {
    /// No bound; the host may select any state.
    Unbounded,
    /// Bound at the given cooling state.
    State(u32),
}

/// The host's default weight for a trip/actuator binding.
pub const WEIGHT_DEFAULT: u32 = 0;

/// The callbacks a sensor exposes to its thermal zone.
///
/// The host serializes calls into these callbacks; implementations need
/// not be reentrant.
pub trait SensorOps {
    /// Returns the current temperature, in millidegrees.
    ///
    /// Returns [`Errno::Again`] if no trustworthy reading is available right
    /// now; the host should retry on its next polling cycle.
    fn get_temp(&self) -> Result<i32, crate::Error<Errno>>;

    /// Estimates the trend of `temperature`, the zone's most recently
    /// reported temperature, with respect to `trip`.
    fn get_trend(&self, temperature: i32, trip: TripKind) -> Trend;

    /// Overwrites the temperature of `trip`.
    fn set_trip_temp(&mut self, trip: TripKind, temperature: i32);
}

/// An actuator the host can use to shed heat, such as a frequency scaler.
pub trait CoolingDevice {
    /// A human-readable name for this actuator.
    fn name(&self) -> &str;
}

/// A thermal zone a sensor has been registered into.
pub trait Zone {
    /// A human-readable name for this zone.
    fn name(&self) -> &str;

    /// The temperature most recently reported through this zone.
    fn temperature(&self) -> i32;

    /// The zone's trip points, as configured by the host.
    fn trips(&self) -> &[Trip];

    /// Binds `cdev` to the trip at index `trip`.
    fn bind_cooling<D: CoolingDevice>(
        &mut self,
        trip: usize,
        cdev: &D,
        upper: Limit,
        lower: Limit,
        weight: u32,
    ) -> Result<(), Errno>;

    /// Undoes a previous `bind_cooling()`.
    fn unbind_cooling<D: CoolingDevice>(
        &mut self,
        trip: usize,
        cdev: &D,
    ) -> Result<(), Errno>;

    /// Exposes this zone through the host's hardware-monitoring interface.
    fn add_hwmon(&mut self) -> Result<(), Errno>;

    /// Undoes a previous `add_hwmon()`.
    fn remove_hwmon(&mut self);

    /// Returns the index of the first trip of the given kind.
    fn find_trip(&self, kind: TripKind) -> Option<(usize, Trip)> {
        self.trips()
            .iter()
            .enumerate()
            .find(|(_, t)| t.kind == kind)
            .map(|(i, t)| (i, *t))
    }
}

/// The host's thermal-zone framework.
///
/// Registration only creates the zone; it does not hand the host any
/// [`SensorOps`]. The integration owns the bound
/// [`Device`](crate::driver::Device) and routes the host's polls to
/// [`Device::get_temp()`](crate::driver::Device::get_temp),
/// [`Device::get_trend()`](crate::driver::Device::get_trend) and
/// [`Device::set_trip_temp()`](crate::driver::Device::set_trip_temp),
/// feeding each reading back into the zone so that the next trend estimate
/// sees it.
pub trait ThermalHost {
    /// The zone handle type.
    type Zone: Zone;

    /// Registers sensor number `sensor_id` of the calling device, returning
    /// the zone it feeds.
    ///
    /// The host must not poll the sensor through the zone; see the
    /// trait-level documentation.
    fn register_sensor(&mut self, sensor_id: u32) -> Result<Self::Zone, Errno>;

    /// Unregisters a sensor, releasing its zone.
    fn unregister_sensor(&mut self, zone: Self::Zone);
}

/// The host's cooling-device framework.
pub trait CoolingFramework {
    /// The actuator handle type.
    type Device: CoolingDevice;

    /// Registers a cooling actuator.
    ///
    /// Returns [`Errno::ProbeDefer`] if the actuator's own dependencies are
    /// not available yet.
    fn register(&mut self) -> Result<Self::Device, Errno>;

    /// Unregisters an actuator.
    fn unregister(&mut self, cdev: Self::Device);
}
