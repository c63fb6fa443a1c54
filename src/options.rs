// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Integration-provided configuration for a TMU instance.

use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::driver::probe;

/// Options struct for [`probe()`].
///
/// The defaults describe an i.MX8MM; an integration for a part with a
/// different fuse map overrides the relevant fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options<'a> {
    /// Which sensor of the device to register with the thermal host.
    pub sensor_id: u32,

    /// The compatible string identifying the OTP fuse controller.
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub fuse_compatible: &'a str,
    /// The byte offset of the calibration word within the fuse window.
    pub fuse_offset: usize,

    /// How long to wait before re-reading a sensor that looked like it was
    /// mid-measurement.
    pub retry_delay: Duration,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            sensor_id: 0,
            fuse_compatible: "fsl,imx8mm-ocotp",
            fuse_offset: 0x4f0,
            retry_delay: Duration::from_millis(10),
        }
    }
}
