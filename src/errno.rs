// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Status codes surfaced to the host driver-binding framework.

use core::fmt;

/// A failure status, as understood by the host.
///
/// Every fallible operation in this crate, including the host-facing
/// collaborator traits, speaks in terms of `Errno`. Use
/// [`Errno::to_errno()`] to obtain the negative integer status a C-style
/// binding framework expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Errno {
    /// A device, device node, or register window does not exist.
    NoDevice,
    /// An allocation failed.
    NoMemory,
    /// The operation could not complete right now, but may succeed if
    /// retried later.
    Again,
    /// An argument or piece of configuration was malformed.
    Invalid,
    /// A hardware or bus operation failed.
    Io,
    /// A resource is already claimed.
    Busy,
    /// A dependency is not available yet; the host should retry the probe
    /// once more drivers have bound.
    ProbeDefer,
}

impl Errno {
    /// Returns the negative status code corresponding to this error.
    pub fn to_errno(self) -> i32 {
        match self {
            Self::NoDevice => -19,
            Self::NoMemory => -12,
            Self::Again => -11,
            Self::Invalid => -22,
            Self::Io => -5,
            Self::Busy => -16,
            Self::ProbeDefer => -517,
        }
    }

    /// Returns whether this status asks the host to retry the probe later,
    /// rather than giving up on the device.
    pub fn is_deferral(self) -> bool {
        self == Self::ProbeDefer
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::NoDevice => "ENODEV",
            Self::NoMemory => "ENOMEM",
            Self::Again => "EAGAIN",
            Self::Invalid => "EINVAL",
            Self::Io => "EIO",
            Self::Busy => "EBUSY",
            Self::ProbeDefer => "EPROBE_DEFER",
        };
        write!(f, "{} ({})", name, self.to_errno())
    }
}
