// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! The TMU sensor proper.
//!
//! [`Tmu`] wraps a mapped register window and implements the
//! [`SensorOps`] callbacks on top of it: reading and calibrating the
//! immediate temperature, estimating trends, and tracking trip points.

use core::time::Duration;

use enumflags2::BitFlags;

use crate::errno::Errno;
use crate::hardware::Delay;
use crate::hardware::Mmio;
use crate::thermal::SensorOps;
use crate::thermal::Trend;
use crate::thermal::TripKind;

pub mod calibration;
pub mod regs;

pub use calibration::Calibration;

/// Readings below this many degrees are taken to mean the sensor is still
/// mid-measurement.
pub const TEMP_LOW_LIMIT: i32 = 10;

/// The width, in millidegrees, of the band below a trip point within which
/// the temperature is considered to be rising into the trip.
pub const PASSIVE_COOL_DELTA: i32 = 10_000;

/// A Thermal Monitor Unit.
///
/// A `Tmu` does not report temperatures until it has been calibrated with
/// [`Tmu::calibrate()`], which may happen at most once.
pub struct Tmu<M, D> {
    mmio: M,
    delay: D,
    retry_delay: Duration,
    enabled: bool,
    calibration: Option<Calibration>,
    temp_passive: i32,
    temp_critical: i32,
}

impl<M: Mmio, D: Delay> Tmu<M, D> {
    /// Creates a new `Tmu` over the given register window.
    ///
    /// The monitor is left disabled and uncalibrated.
    pub fn new(mmio: M, delay: D, retry_delay: Duration) -> Self {
        Self {
            mmio,
            delay,
            retry_delay,
            enabled: false,
            calibration: None,
            temp_passive: 0,
            temp_critical: 0,
        }
    }

    /// Sets the hardware enable bit.
    pub fn enable(&mut self) {
        self.mmio.modify32(regs::TER, |v| {
            v | BitFlags::from(regs::Ter::Enable).bits()
        });
        self.enabled = true;
    }

    /// Clears the hardware enable bit.
    pub fn disable(&mut self) {
        self.mmio.modify32(regs::TER, |v| {
            v & !BitFlags::from(regs::Ter::Enable).bits()
        });
        self.enabled = false;
    }

    /// Returns whether the monitor has been enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fixes the calibration mode for the rest of this `Tmu`'s life.
    ///
    /// Returns [`Errno::Busy`] if a mode was already chosen.
    pub fn calibrate(
        &mut self,
        calibration: Calibration,
    ) -> Result<(), crate::Error<Errno>> {
        check!(self.calibration.is_none(), Errno::Busy);
        self.calibration = Some(calibration);
        Ok(())
    }

    /// Returns the calibration mode, if one has been chosen.
    pub fn calibration(&self) -> Option<Calibration> {
        self.calibration
    }

    /// Sets both trip temperatures at once.
    pub fn set_trips(&mut self, passive: i32, critical: i32) {
        self.temp_passive = passive;
        self.temp_critical = critical;
    }

    /// Returns the stored temperature of `trip`.
    pub fn trip_temp(&self, trip: TripKind) -> i32 {
        match trip {
            TripKind::Passive => self.temp_passive,
            TripKind::Critical => self.temp_critical,
        }
    }

    /// Consumes this `Tmu`, returning its register window.
    pub fn into_mmio(self) -> M {
        self.mmio
    }

    /// Takes one reading, in whole degrees.
    fn sample(&self, calibration: Calibration) -> i32 {
        let immediate = self.mmio.read32(regs::TRITSR);
        trace!(
            "TRITSR = {:#010x} (valid: {})",
            immediate,
            BitFlags::<regs::Tritsr>::from_bits_truncate(immediate)
                .contains(regs::Tritsr::Valid),
        );
        let raw = match calibration {
            Calibration::Hardware => immediate,
            Calibration::Software { .. } => self.mmio.read32(regs::TSCR),
        };
        calibration.correct((raw & regs::TEMP_VAL_MASK) as u8)
    }
}

impl<M: Mmio, D: Delay> SensorOps for Tmu<M, D> {
    fn get_temp(&self) -> Result<i32, crate::Error<Errno>> {
        let calibration = match self.calibration {
            Some(c) => c,
            None => {
                return Err(retry!(
                    Errno::Again,
                    "temperature requested before calibration"
                ))
            }
        };

        let mut temp = self.sample(calibration);
        if temp < TEMP_LOW_LIMIT {
            // The sensor needs about 1ms to finish a measurement.
            self.delay.sleep(self.retry_delay);
            temp = self.sample(calibration);
            if temp < TEMP_LOW_LIMIT {
                return Err(retry!(
                    Errno::Again,
                    "sensor reading {} below {} after retry",
                    temp,
                    TEMP_LOW_LIMIT,
                ));
            }
        }

        Ok(temp * 1000)
    }

    fn get_trend(&self, temperature: i32, trip: TripKind) -> Trend {
        let trip_temp = self.trip_temp(trip);
        if temperature >= trip_temp.saturating_sub(PASSIVE_COOL_DELTA) {
            Trend::RaiseFull
        } else {
            Trend::DropFull
        }
    }

    fn set_trip_temp(&mut self, trip: TripKind, temperature: i32) {
        match trip {
            TripKind::Passive => self.temp_passive = temperature,
            TripKind::Critical => self.temp_critical = temperature,
        }
    }
}
