// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `tmu` is a driver for the Thermal Monitor Unit found on i.MX8MM-class
//! SoCs.
//!
//! The TMU is a small on-die temperature sensor. This crate reports its
//! readings to a host thermal framework, corrects them with a factory
//! calibration value burned into OTP fuses, and binds a cooling actuator to
//! the passive trip point so that the host can throttle the chip before it
//! reaches the critical trip.
//!
//! `tmu` does not talk to any particular kernel. Everything it needs from
//! its environment is expressed as a trait:
//! - [`hardware`] covers register access, clocks, delays, and device-node
//!   lookup.
//! - [`thermal`] covers the thermal-zone and cooling-device frameworks.
//!
//! The [`driver`] module ties these together into a probe/remove lifecycle,
//! and [`sensor`] holds the temperature logic proper.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(warnings)]
#![deny(unused)]
#![deny(unsafe_code)]

#[macro_use]
mod debug;
pub use debug::Error;

pub mod driver;
pub mod errno;
pub mod hardware;
pub mod options;
pub mod sensor;
pub mod thermal;

pub use errno::Errno;
pub use options::Options;
