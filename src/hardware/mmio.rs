// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Volatile register windows.
//!
//! [`Volatile`] is the [`Mmio`] implementation for real hardware: a base
//! address and a length, accessed with volatile loads and stores.

#![allow(unsafe_code)]

use core::ptr;

use crate::hardware::Mmio;

/// A mapped window of device registers.
pub struct Volatile {
    base: usize,
    len: usize,
}

impl Volatile {
    /// Creates a new `Volatile` window of `len` bytes starting at `base`.
    ///
    /// # Safety
    ///
    /// `base..base + len` must be a mapped, device-owned address range that
    /// nothing else accesses for the lifetime of the returned value, and
    /// `base` must be 4-byte aligned.
    pub const unsafe fn new(base: usize, len: usize) -> Self {
        Self { base, len }
    }

    /// Returns the base address of this window.
    pub fn base(&self) -> usize {
        self.base
    }

    fn addr(&self, offset: usize) -> *mut u32 {
        assert!(
            self.contains32(offset),
            "register offset {:#x} outside of {:#x}-byte window",
            offset,
            self.len,
        );
        (self.base + offset) as *mut u32
    }
}

impl Mmio for Volatile {
    fn window_len(&self) -> usize {
        self.len
    }

    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: `new()` requires the window to be valid for its whole
        // length, and `addr()` bounds-checks the offset.
        unsafe { ptr::read_volatile(self.addr(offset)) }
    }

    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        // SAFETY: see `read32()`.
        unsafe { ptr::write_volatile(self.addr(offset), value) }
    }
}
