// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Driver matching by compatible string.
//!
//! An integration builds a [`Registry`] at startup, registers the drivers it
//! wants available, and asks it which driver should handle each device node
//! it discovers; [`Registry::bind()`] does both the matching and the probe.
//! Dropping the registry (or calling [`Registry::unregister()`]) withdraws
//! drivers at shutdown.

use arrayvec::ArrayVec;

use crate::driver::probe;
use crate::driver::Bus;
use crate::driver::Device;
use crate::errno::Errno;
use crate::hardware::Node;
use crate::hardware::Platform;
use crate::options::Options;
use crate::thermal::CoolingFramework;
use crate::thermal::ThermalHost;

/// A driver's identity and the devices it can bind to.
#[derive(Debug, PartialEq, Eq)]
pub struct DriverInfo {
    /// The driver's unique name.
    pub name: &'static str,
    /// The compatible strings this driver matches.
    pub compatible: &'static [&'static str],
}

impl DriverInfo {
    /// Returns whether this driver can bind to a device with the given
    /// compatible string.
    pub fn matches(&self, compatible: &str) -> bool {
        self.compatible.iter().any(|c| *c == compatible)
    }
}

/// The i.MX8MM TMU driver provided by this crate.
pub static IMX8MM_TMU: DriverInfo = DriverInfo {
    name: "i.mx8mm_thermal",
    compatible: &["fsl,imx8mm-tmu"],
};

const MAX_DRIVERS: usize = 8;

/// A table of registered drivers, keyed by compatible string.
#[derive(Default)]
pub struct Registry<'a> {
    drivers: ArrayVec<&'a DriverInfo, MAX_DRIVERS>,
}

impl<'a> Registry<'a> {
    /// Creates an empty `Registry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `driver` to the table.
    ///
    /// Returns [`Errno::Busy`] if a driver with the same name is already
    /// registered, and [`Errno::NoMemory`] if the table is full.
    pub fn register(
        &mut self,
        driver: &'a DriverInfo,
    ) -> Result<(), crate::Error<Errno>> {
        check!(self.get(driver.name).is_none(), Errno::Busy);
        self.drivers.try_push(driver).map_err(|_| {
            fail!(Errno::NoMemory, "driver table full; dropped {}", driver.name)
        })?;
        trace!("registered driver {}", driver.name);
        Ok(())
    }

    /// Removes the driver called `name`, returning it if it was present.
    pub fn unregister(&mut self, name: &str) -> Option<&'a DriverInfo> {
        let index = self.drivers.iter().position(|d| d.name == name)?;
        trace!("unregistered driver {}", name);
        Some(self.drivers.remove(index))
    }

    /// Returns the driver called `name`.
    pub fn get(&self, name: &str) -> Option<&'a DriverInfo> {
        self.drivers.iter().copied().find(|d| d.name == name)
    }

    /// Returns the first registered driver matching `compatible`.
    pub fn lookup(&self, compatible: &str) -> Option<&'a DriverInfo> {
        self.drivers.iter().copied().find(|d| d.matches(compatible))
    }

    /// Returns the driver that should bind to `node`, if any.
    pub fn match_node(
        &self,
        platform: &impl Platform,
        node: Node,
    ) -> Option<&'a DriverInfo> {
        let driver = self.lookup(platform.compatible(node)?);
        if let Some(d) = driver {
            trace!("{:?} matched by {}", node, d.name);
        }
        driver
    }

    /// Matches `node` against the table and, if it is claimed by
    /// [`IMX8MM_TMU`], probes it.
    ///
    /// Returns [`Errno::NoDevice`] without touching the bus if no registered
    /// driver matches `node`, or if the matching driver is not one this
    /// crate provides.
    pub fn bind<P, T, C>(
        &self,
        bus: &mut Bus<'_, P, T, C>,
        node: Node,
        opts: &Options,
    ) -> Result<Device<P, T, C>, crate::Error<Errno>>
    where
        P: Platform,
        T: ThermalHost,
        C: CoolingFramework,
    {
        let driver = self
            .match_node(&*bus.platform, node)
            .ok_or_else(|| fail!(Errno::NoDevice))?;
        check!(*driver == IMX8MM_TMU, Errno::NoDevice);
        probe(bus, Some(node), opts)
    }

    /// Returns the number of registered drivers.
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Returns whether no drivers are registered.
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}
