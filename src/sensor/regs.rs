// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! TMU register map.

use enumflags2::bitflags;

/// TMU enable.
pub const TER: usize = 0x00;
/// TMU status.
pub const TSR: usize = 0x04;
/// TMU interrupt enable.
pub const TIER: usize = 0x08;
/// TMU interrupt detect.
pub const TIDR: usize = 0x0c;
/// TMU high immediate threshold.
pub const TMHTITR: usize = 0x10;
/// TMU high average threshold.
pub const TMHTATR: usize = 0x14;
/// TMU high average critical threshold.
pub const TMHTCATR: usize = 0x18;
/// TMU sensor value (raw, no calibration).
pub const TSCR: usize = 0x1c;
/// TMU immediate temperature.
pub const TRITSR: usize = 0x20;
/// TMU average temperature.
pub const TRATSR: usize = 0x24;

/// Bits of [`TER`].
#[bitflags]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ter {
    /// Turns the monitor on.
    Enable = 1 << 31,
}

/// Bits of [`TRITSR`] and [`TRATSR`].
#[bitflags]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tritsr {
    /// Set by hardware once the reading is complete.
    Valid = 1 << 31,
}

/// Mask for the temperature magnitude in [`TSCR`] and [`TRITSR`].
pub const TEMP_VAL_MASK: u32 = 0xff;
