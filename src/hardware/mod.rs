// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Pluggable hardware functionality
//!
//! This module provides traits for plugging in the platform services the
//! driver depends on: register windows, clocks, sleeping, and device-node
//! lookup. An integration implements [`Platform`] once for its environment;
//! tests use the fakes in this module instead.

use core::mem;
use core::time::Duration;

use static_assertions::assert_obj_safe;

use crate::errno::Errno;

pub mod mmio;
pub use mmio::Volatile;

#[cfg(test)]
pub(crate) mod fake;

/// An opaque handle to a node in the platform's device description, such
/// as a devicetree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Node(pub u32);

/// Provides typed access to a window of memory-mapped registers.
///
/// Offsets are in bytes from the start of the window. Accesses are "relaxed":
/// no ordering is implied between them beyond program order on the same
/// window.
pub trait Mmio {
    /// Returns the length of this window, in bytes.
    fn window_len(&self) -> usize;

    /// Returns whether a 32-bit register at `offset` is naturally aligned
    /// and lies entirely within this window.
    ///
    /// [`Mmio::read32()`] and [`Mmio::write32()`] may panic for any `offset`
    /// this function rejects.
    fn contains32(&self, offset: usize) -> bool {
        let size = mem::size_of::<u32>();
        offset % size == 0
            && offset
                .checked_add(size)
                .map_or(false, |end| end <= self.window_len())
    }

    /// Reads the 32-bit register at `offset`.
    fn read32(&self, offset: usize) -> u32;

    /// Writes `value` to the 32-bit register at `offset`.
    fn write32(&mut self, offset: usize, value: u32);

    /// Performs a read-modify-write of the register at `offset`.
    fn modify32(&mut self, offset: usize, f: impl FnOnce(u32) -> u32)
    where
        Self: Sized,
    {
        let value = self.read32(offset);
        self.write32(offset, f(value));
    }
}
assert_obj_safe!(Mmio);

/// A gateable input clock.
pub trait Clock {
    /// Prepares and ungates the clock.
    fn prepare_enable(&mut self) -> Result<(), Errno>;

    /// Gates and unprepares the clock.
    ///
    /// Must only be called after a successful `prepare_enable()`.
    fn disable_unprepare(&mut self);
}
assert_obj_safe!(Clock);

/// Blocks the calling context for a fixed amount of time.
///
/// Sleeps cannot be cancelled; an implementation must not return before
/// `duration` has elapsed.
pub trait Delay {
    /// Sleeps for `duration`.
    fn sleep(&self, duration: Duration);
}
assert_obj_safe!(Delay);

/// Any sleeping function can act as a `Delay`, e.g. `std::thread::sleep`.
impl<F: Fn(Duration)> Delay for F {
    fn sleep(&self, duration: Duration) {
        self(duration)
    }
}

/// The platform services needed to bind a device.
///
/// This trait covers the pieces of the platform-device layer that the
/// driver touches directly: mapping register windows described by device
/// nodes, finding nodes by compatible string, and handing out clocks.
pub trait Platform {
    /// The register-window type produced by [`Platform::iomap()`].
    type Mmio: Mmio;
    /// The clock type produced by [`Platform::clock()`].
    type Clock: Clock;
    /// The sleep provider for this platform.
    type Delay: Delay;

    /// Maps the first register window of `node`.
    ///
    /// Returns `None` if the node has no such window or it could not be
    /// mapped.
    fn iomap(&mut self, node: Node) -> Option<Self::Mmio>;

    /// Releases a window previously returned by `iomap()`.
    fn iounmap(&mut self, mmio: Self::Mmio);

    /// Finds the first node whose compatible list contains `compatible`.
    fn find_compatible(&self, compatible: &str) -> Option<Node>;

    /// Returns the primary compatible string of `node`, if it has one.
    fn compatible(&self, node: Node) -> Option<&str>;

    /// Looks up the default input clock of `node`.
    fn clock(&mut self, node: Node) -> Result<Self::Clock, Errno>;

    /// Returns a sleep provider.
    fn delay(&self) -> Self::Delay;
}
