// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Fakes for the host thermal frameworks in `tmu::thermal`.

use std::cell::Cell;
use std::rc::Rc;

use crate::errno::Errno;
use crate::hardware::fake::Event;
use crate::hardware::fake::Journal;
use crate::thermal::Limit;
use crate::thermal::Trip;
use crate::thermal::WEIGHT_DEFAULT;

/// A fake `ThermalHost` that hands out a single zone with a fixed trip
/// table.
pub struct Host {
    journal: Journal,
    trips: Vec<Trip>,
    temperature: Rc<Cell<i32>>,
    /// If set, `register_sensor()` fails with this error.
    pub register_error: Option<Errno>,
    /// If set, the zone's `bind_cooling()` fails with this error.
    pub bind_error: Option<Errno>,
    /// If set, the zone's `add_hwmon()` fails with this error.
    pub hwmon_error: Option<Errno>,
}

impl Host {
    pub fn new(journal: Journal, trips: &[Trip]) -> Self {
        Self {
            journal,
            trips: trips.to_vec(),
            temperature: Rc::new(Cell::new(0)),
            register_error: None,
            bind_error: None,
            hwmon_error: None,
        }
    }

    /// Sets the zone's cached temperature, as if the host had just polled
    /// the sensor.
    pub fn set_temperature(&self, temperature: i32) {
        self.temperature.set(temperature)
    }
}

impl super::ThermalHost for Host {
    type Zone = Zone;

    fn register_sensor(&mut self, sensor_id: u32) -> Result<Zone, Errno> {
        if let Some(e) = self.register_error {
            return Err(e);
        }
        self.journal.push(Event::RegisterSensor(sensor_id));
        Ok(Zone {
            journal: self.journal.clone(),
            trips: self.trips.clone(),
            temperature: Rc::clone(&self.temperature),
            bind_error: self.bind_error,
            hwmon_error: self.hwmon_error,
        })
    }

    fn unregister_sensor(&mut self, _: Zone) {
        self.journal.push(Event::UnregisterSensor);
    }
}

/// The zone handed out by [`Host`].
pub struct Zone {
    journal: Journal,
    trips: Vec<Trip>,
    temperature: Rc<Cell<i32>>,
    bind_error: Option<Errno>,
    hwmon_error: Option<Errno>,
}

impl super::Zone for Zone {
    fn name(&self) -> &str {
        "cpu-thermal"
    }

    fn temperature(&self) -> i32 {
        self.temperature.get()
    }

    fn trips(&self) -> &[Trip] {
        &self.trips
    }

    fn bind_cooling<D: super::CoolingDevice>(
        &mut self,
        trip: usize,
        _: &D,
        upper: Limit,
        lower: Limit,
        weight: u32,
    ) -> Result<(), Errno> {
        assert_eq!(upper, Limit::Unbounded);
        assert_eq!(lower, Limit::Unbounded);
        assert_eq!(weight, WEIGHT_DEFAULT);
        if let Some(e) = self.bind_error {
            return Err(e);
        }
        self.journal.push(Event::Bind { trip });
        Ok(())
    }

    fn unbind_cooling<D: super::CoolingDevice>(
        &mut self,
        trip: usize,
        _: &D,
    ) -> Result<(), Errno> {
        self.journal.push(Event::Unbind { trip });
        Ok(())
    }

    fn add_hwmon(&mut self) -> Result<(), Errno> {
        if let Some(e) = self.hwmon_error {
            return Err(e);
        }
        self.journal.push(Event::AddHwmon);
        Ok(())
    }

    fn remove_hwmon(&mut self) {
        self.journal.push(Event::RemoveHwmon);
    }
}

/// A fake `CoolingFramework`.
pub struct Cooling {
    journal: Journal,
    /// If set, `register()` fails with this error.
    pub register_error: Option<Errno>,
}

impl Cooling {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            register_error: None,
        }
    }
}

impl super::CoolingFramework for Cooling {
    type Device = Actuator;

    fn register(&mut self) -> Result<Actuator, Errno> {
        if let Some(e) = self.register_error {
            return Err(e);
        }
        self.journal.push(Event::RegisterCooling);
        Ok(Actuator)
    }

    fn unregister(&mut self, _: Actuator) {
        self.journal.push(Event::UnregisterCooling);
    }
}

/// The actuator handed out by [`Cooling`].
pub struct Actuator;

impl super::CoolingDevice for Actuator {
    fn name(&self) -> &str {
        "devfreq-cooling"
    }
}
