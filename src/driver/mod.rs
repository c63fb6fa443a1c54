// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Binding a TMU to the host.
//!
//! [`probe()`] walks a device node through every [`State`] up to
//! [`State::Ready`], acquiring one resource per step and recording how to
//! release it in an [`Unwind`] list. If any fatal step fails, everything
//! acquired so far is released before the error is returned. A bound
//! [`Device`] is torn down with [`Device::remove()`], which replays the same
//! list.
//!
//! Calibration is the one step that cannot fail the probe: if the fuse
//! cannot be found or was never programmed, the device falls back to the
//! hardware's own calibrated readings.

use crate::errno::Errno;
use crate::hardware::Clock as _;
use crate::hardware::Mmio as _;
use crate::hardware::Node;
use crate::hardware::Platform;
use crate::options::Options;
use crate::sensor::Calibration;
use crate::sensor::Tmu;
use crate::thermal::CoolingDevice as _;
use crate::thermal::CoolingFramework;
use crate::thermal::Limit;
use crate::thermal::SensorOps;
use crate::thermal::ThermalHost;
use crate::thermal::Trend;
use crate::thermal::TripKind;
use crate::thermal::Zone as _;
use crate::thermal::WEIGHT_DEFAULT;

pub mod registry;
pub mod state;
pub mod unwind;

pub use state::State;
pub use unwind::Release;
pub use unwind::Unwind;

/// The host services a device is bound against.
pub struct Bus<'a, P, T, C> {
    /// The platform-device layer.
    pub platform: &'a mut P,
    /// The thermal-zone framework.
    pub thermal: &'a mut T,
    /// The cooling-device framework.
    pub cooling: &'a mut C,
}

type Sensor<P> = Tmu<<P as Platform>::Mmio, <P as Platform>::Delay>;

/// A TMU bound to the host.
///
/// This is the sensor-callback handle for the zone the device registered
/// into: the integration answers the host's temperature polls with
/// [`Device::get_temp()`], its governor's trend queries with
/// [`Device::get_trend()`], and trip updates with
/// [`Device::set_trip_temp()`].
pub struct Device<P: Platform, T: ThermalHost, C: CoolingFramework> {
    tmu: Sensor<P>,
    clock: P::Clock,
    zone: T::Zone,
    cdev: C::Device,
    passive_trip: usize,
    state: State,
    unwind: Unwind,
}

/// Whatever subset of a device's resources is currently held.
///
/// This is what the release path operates on, since it must cope with a
/// probe that failed halfway.
struct Parts<P: Platform, T: ThermalHost, C: CoolingFramework> {
    tmu: Option<Sensor<P>>,
    clock: Option<P::Clock>,
    zone: Option<T::Zone>,
    cdev: Option<C::Device>,
    passive_trip: usize,
    state: State,
    unwind: Unwind,
}

fn advance(state: &mut State, next: State) {
    trace!("{:?} -> {:?}", state, next);
    *state = next;
}

impl<P: Platform, T: ThermalHost, C: CoolingFramework> Parts<P, T, C> {
    /// Runs every pending release step, returning the final state.
    fn release(mut self, bus: &mut Bus<'_, P, T, C>) -> State {
        let mut unwind = core::mem::take(&mut self.unwind);
        for step in unwind.drain() {
            trace!("release: {:?}", step);
            match step {
                Release::UnbindCooling => {
                    let trip = self.passive_trip;
                    let held = (&mut self.zone, &self.cdev);
                    if let (Some(zone), Some(cdev)) = held {
                        if let Err(e) = zone.unbind_cooling(trip, cdev) {
                            warn!(
                                "unbinding zone {} from cdev {} failed: {}",
                                zone.name(),
                                cdev.name(),
                                e
                            );
                        }
                    }
                }
                Release::UnregisterCooling => {
                    if let Some(cdev) = self.cdev.take() {
                        bus.cooling.unregister(cdev);
                    }
                    advance(&mut self.state, State::Unbound);
                }
                Release::RemoveHwmon => {
                    if let Some(zone) = &mut self.zone {
                        zone.remove_hwmon();
                    }
                }
                Release::ClearEnable => {
                    if let Some(tmu) = &mut self.tmu {
                        tmu.disable();
                    }
                }
                Release::DisableClock => {
                    if let Some(clock) = &mut self.clock {
                        clock.disable_unprepare();
                    }
                    advance(&mut self.state, State::Disabled);
                }
                Release::UnregisterSensor => {
                    if let Some(zone) = self.zone.take() {
                        bus.thermal.unregister_sensor(zone);
                    }
                }
                Release::Unmap => {
                    if let Some(tmu) = self.tmu.take() {
                        bus.platform.iounmap(tmu.into_mmio());
                    }
                    advance(&mut self.state, State::Unmapped);
                }
            }
        }
        self.state
    }
}

/// Binds the TMU described by `node`.
///
/// `node` is `None` if the host found no device node for this device, in
/// which case the probe fails with [`Errno::NoDevice`].
///
/// On failure, every resource acquired along the way has been released.
/// An [`Errno::ProbeDefer`] from the cooling framework is passed through
/// unchanged so that the host can retry later.
pub fn probe<P, T, C>(
    bus: &mut Bus<'_, P, T, C>,
    node: Option<Node>,
    opts: &Options,
) -> Result<Device<P, T, C>, crate::Error<Errno>>
where
    P: Platform,
    T: ThermalHost,
    C: CoolingFramework,
{
    let node = match node {
        Some(node) => node,
        None => return Err(fail!(Errno::NoDevice, "device node NOT found")),
    };

    let mmio = match bus.platform.iomap(node) {
        Some(mmio) => mmio,
        None => {
            return Err(fail!(
                Errno::NoDevice,
                "failed to map the memory of {:?}",
                node
            ))
        }
    };

    let mut parts = Parts::<P, T, C> {
        tmu: Some(Tmu::new(mmio, bus.platform.delay(), opts.retry_delay)),
        clock: None,
        zone: None,
        cdev: None,
        passive_trip: 0,
        state: State::Uninitialized,
        unwind: Unwind::new(),
    };
    parts.unwind.push(Release::Unmap);
    advance(&mut parts.state, State::Mapped);

    match bring_up(&mut parts, bus, node, opts) {
        Ok(()) => {}
        Err(e) => {
            parts.release(bus);
            return Err(e);
        }
    }

    // `bring_up()` fills in every part before it returns `Ok`.
    match parts {
        Parts {
            tmu: Some(tmu),
            clock: Some(clock),
            zone: Some(zone),
            cdev: Some(cdev),
            passive_trip,
            state,
            unwind,
        } => Ok(Device {
            tmu,
            clock,
            zone,
            cdev,
            passive_trip,
            state,
            unwind,
        }),
        parts => {
            parts.release(bus);
            Err(fail!(Errno::Invalid, "probe finished with missing resources"))
        }
    }
}

/// The fallible middle of [`probe()`]; on error, the caller releases
/// `parts`.
fn bring_up<P, T, C>(
    parts: &mut Parts<P, T, C>,
    bus: &mut Bus<'_, P, T, C>,
    node: Node,
    opts: &Options,
) -> Result<(), crate::Error<Errno>>
where
    P: Platform,
    T: ThermalHost,
    C: CoolingFramework,
{
    let clock = bus
        .platform
        .clock(node)
        .map_err(|e| fail!(e, "failed to get the tmu clk: {}", e))?;
    let clock = parts.clock.get_or_insert(clock);

    let zone = bus.thermal.register_sensor(opts.sensor_id).map_err(|e| {
        fail!(e, "failed to register thermal zone sensor: {}", e)
    })?;
    let zone = parts.zone.get_or_insert(zone);
    parts.unwind.push(Release::UnregisterSensor);
    advance(&mut parts.state, State::Registered);

    let cdev = bus.cooling.register().map_err(|e| {
        if e.is_deferral() {
            info!("cooling device not ready yet; deferring probe");
            crate::Error::__new(e)
        } else {
            fail!(e, "failed to register devfreq cooling device: {}", e)
        }
    })?;
    let cdev = &*parts.cdev.get_or_insert(cdev);
    parts.unwind.push(Release::UnregisterCooling);

    let (passive_trip, passive) = match zone.find_trip(TripKind::Passive) {
        Some(trip) => trip,
        None => {
            return Err(fail!(
                Errno::Invalid,
                "zone {} has no passive trip",
                zone.name()
            ))
        }
    };
    zone.bind_cooling(
        passive_trip,
        cdev,
        Limit::Unbounded,
        Limit::Unbounded,
        WEIGHT_DEFAULT,
    )
    .map_err(|e| {
        fail!(
            e,
            "binding zone {} with cdev {} failed: {}",
            zone.name(),
            cdev.name(),
            e
        )
    })?;
    parts.passive_trip = passive_trip;
    parts.unwind.push(Release::UnbindCooling);
    advance(&mut parts.state, State::Bound);

    let critical = match zone.find_trip(TripKind::Critical) {
        Some((_, trip)) => trip,
        None => {
            return Err(fail!(
                Errno::Invalid,
                "zone {} has no critical trip",
                zone.name()
            ))
        }
    };

    clock
        .prepare_enable()
        .map_err(|e| fail!(e, "tmu clock enable failed: {}", e))?;
    parts.unwind.push(Release::DisableClock);

    let tmu = match &mut parts.tmu {
        Some(tmu) => tmu,
        None => return Err(fail!(Errno::Invalid, "register window went away")),
    };
    tmu.set_trips(passive.temperature, critical.temperature);
    tmu.enable();
    parts.unwind.push(Release::ClearEnable);
    advance(&mut parts.state, State::Enabled);

    zone.add_hwmon()
        .map_err(|e| fail!(e, "failed to add hwmon interface: {}", e))?;
    parts.unwind.push(Release::RemoveHwmon);

    advance(&mut parts.state, State::Calibrating);
    let calibration = read_calibration(&mut *bus.platform, opts);
    match calibration {
        Calibration::Software { offset } => {
            info!(
                "using software calibrated temperature: OTP_CAL = {}",
                offset
            );
        }
        Calibration::Hardware => {
            warn!("using (potentially buggy) hardware calibrated value");
        }
    }
    tmu.calibrate(calibration)?;

    advance(&mut parts.state, State::Ready);
    Ok(())
}

/// Reads the calibration fuse.
///
/// Every failure here is logged and answered with hardware calibration.
fn read_calibration<P: Platform>(
    platform: &mut P,
    opts: &Options,
) -> Calibration {
    let node = match platform.find_compatible(opts.fuse_compatible) {
        Some(node) => node,
        None => {
            warn!("failed to find {} node", opts.fuse_compatible);
            return Calibration::Hardware;
        }
    };

    let fuse = match platform.iomap(node) {
        Some(fuse) => fuse,
        None => {
            warn!("failed to map {}", opts.fuse_compatible);
            return Calibration::Hardware;
        }
    };

    if !fuse.contains32(opts.fuse_offset) {
        warn!(
            "fuse offset {:#x} is not a register of the {:#x}-byte {} window",
            opts.fuse_offset,
            fuse.window_len(),
            opts.fuse_compatible,
        );
        platform.iounmap(fuse);
        return Calibration::Hardware;
    }

    let word = fuse.read32(opts.fuse_offset);
    platform.iounmap(fuse);

    let calibration = Calibration::from_fuse(word);
    if !calibration.is_software() {
        error!("invalid sensor calibration data: {:#x}", word);
    }
    calibration
}

impl<P: Platform, T: ThermalHost, C: CoolingFramework> Device<P, T, C> {
    /// Returns the current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the sensor, for the host to poll.
    pub fn sensor(&self) -> &Sensor<P> {
        &self.tmu
    }

    /// Returns the sensor mutably, for the host to update trip points.
    pub fn sensor_mut(&mut self) -> &mut Sensor<P> {
        &mut self.tmu
    }

    /// Returns the zone this device feeds.
    pub fn zone(&self) -> &T::Zone {
        &self.zone
    }

    /// Returns the calibration mode chosen at probe time.
    pub fn calibration(&self) -> Calibration {
        self.tmu.calibration().unwrap_or(Calibration::Hardware)
    }

    /// Reads the current temperature, in millidegrees.
    pub fn get_temp(&self) -> Result<i32, crate::Error<Errno>> {
        self.tmu.get_temp()
    }

    /// Estimates the trend toward `trip` from the zone's last reported
    /// temperature.
    pub fn get_trend(&self, trip: TripKind) -> Trend {
        self.tmu.get_trend(self.zone.temperature(), trip)
    }

    /// Overwrites the temperature of `trip`.
    pub fn set_trip_temp(&mut self, trip: TripKind, temperature: i32) {
        self.tmu.set_trip_temp(trip, temperature)
    }

    /// Unbinds this device, releasing every resource it holds.
    ///
    /// The cooling actuator is detached first; the register window is
    /// unmapped last. Returns the final state, which is always
    /// [`State::Unmapped`].
    pub fn remove(self, bus: &mut Bus<'_, P, T, C>) -> State {
        let parts = Parts::<P, T, C> {
            tmu: Some(self.tmu),
            clock: Some(self.clock),
            zone: Some(self.zone),
            cdev: Some(self.cdev),
            passive_trip: self.passive_trip,
            state: self.state,
            unwind: self.unwind,
        };
        parts.release(bus)
    }
}
