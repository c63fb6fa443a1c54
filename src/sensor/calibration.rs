// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Factory calibration.
//!
//! Each part has a one-byte calibration value burned into OTP. When present,
//! the driver computes temperatures itself from the raw sensor value:
//! ```text
//! temp = raw - fuse + 25
//! ```
//! When the fuse was never programmed, the driver falls back to the value
//! the hardware calibrates on its own, which is known to be unreliable on
//! some parts.

use crate::sensor::regs;

/// The temperature, in degrees, at which parts are calibrated at the
/// factory.
pub const REFERENCE_TEMP: i32 = 25;

/// How readings are turned into temperatures.
///
/// The mode is chosen once, when the device is bound, and never changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Calibration {
    /// Use the hardware's own calibrated immediate-temperature value.
    Hardware,
    /// Correct the raw sensor value with a fuse-provided offset.
    Software {
        /// The value read from the calibration fuse.
        offset: u8,
    },
}

impl Calibration {
    /// Interprets a word read from the calibration fuse.
    ///
    /// Only the low byte is significant. An all-zeros or all-ones byte
    /// means the fuse was never programmed.
    pub fn from_fuse(word: u32) -> Self {
        match (word & regs::TEMP_VAL_MASK) as u8 {
            0x00 | 0xff => Self::Hardware,
            offset => Self::Software { offset },
        }
    }

    /// Returns whether software calibration is in effect.
    pub fn is_software(self) -> bool {
        matches!(self, Self::Software { .. })
    }

    /// Returns the fuse offset, if software calibration is in effect.
    pub fn offset(self) -> Option<u8> {
        match self {
            Self::Hardware => None,
            Self::Software { offset } => Some(offset),
        }
    }

    /// Converts a raw sensor value into whole degrees.
    ///
    /// In hardware mode, `raw` is expected to already be the hardware's
    /// calibrated value and is returned unchanged. The result may be
    /// negative for a raw value below the fuse offset.
    pub fn correct(self, raw: u8) -> i32 {
        match self {
            Self::Hardware => raw as i32,
            Self::Software { offset } => {
                raw as i32 - offset as i32 + REFERENCE_TEMP
            }
        }
    }
}
