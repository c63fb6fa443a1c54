// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Fakes for filling-in hardware functionality from `tmu::hardware`.
//!
//! Every fake records its side effects into a shared [`Journal`], so tests
//! can assert on the relative order of operations across collaborators.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::errno::Errno;
use crate::hardware::Node;

/// A side effect observed by one of the fakes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Map(Node),
    Unmap(Node),
    Write { node: Node, offset: usize, value: u32 },
    Sleep(Duration),
    ClockEnable,
    ClockDisable,
    RegisterSensor(u32),
    UnregisterSensor,
    RegisterCooling,
    UnregisterCooling,
    Bind { trip: usize },
    Unbind { trip: usize },
    AddHwmon,
    RemoveHwmon,
}

/// A shared, append-only record of [`Event`]s.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event)
    }

    /// Returns every event recorded so far.
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Returns every event except register writes.
    pub fn lifecycle(&self) -> Vec<Event> {
        self.0
            .borrow()
            .iter()
            .filter(|e| !matches!(e, Event::Write { .. }))
            .cloned()
            .collect()
    }

    /// Returns how many sleeps were recorded.
    pub fn sleeps(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Sleep(_)))
            .count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear()
    }
}

#[derive(Default)]
struct RegionState {
    regs: HashMap<usize, u32>,
    scripts: HashMap<usize, VecDeque<u32>>,
    reads: HashMap<usize, usize>,
}

/// The length of a [`Region`] unless a test asks for another.
pub const DEFAULT_WINDOW: usize = 0x1000;

/// A fake register window.
///
/// Clones share the same backing registers, so a test can keep a handle to
/// a region while the driver owns another. Accesses outside the window
/// panic, as they would on a `Volatile`.
#[derive(Clone)]
pub struct Region {
    node: Node,
    len: usize,
    state: Rc<RefCell<RegionState>>,
    journal: Journal,
}

impl Region {
    pub fn new(node: Node, journal: Journal) -> Self {
        Self::with_len(node, DEFAULT_WINDOW, journal)
    }

    pub fn with_len(node: Node, len: usize, journal: Journal) -> Self {
        Self {
            node,
            len,
            state: Default::default(),
            journal,
        }
    }

    /// Sets the current value of the register at `offset`.
    pub fn set(&self, offset: usize, value: u32) {
        self.state.borrow_mut().regs.insert(offset, value);
    }

    /// Queues values to be returned by successive reads of `offset`; once
    /// the queue drains, the last value sticks.
    pub fn script(&self, offset: usize, values: &[u32]) {
        self.state
            .borrow_mut()
            .scripts
            .insert(offset, values.iter().copied().collect());
    }

    /// Returns the current value of the register at `offset`.
    pub fn get(&self, offset: usize) -> u32 {
        self.state.borrow().regs.get(&offset).copied().unwrap_or(0)
    }

    /// Returns how many times `offset` has been read.
    pub fn reads(&self, offset: usize) -> usize {
        self.state.borrow().reads.get(&offset).copied().unwrap_or(0)
    }
}

impl super::Mmio for Region {
    fn window_len(&self) -> usize {
        self.len
    }

    fn read32(&self, offset: usize) -> u32 {
        assert!(self.contains32(offset), "read of {:#x}", offset);
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        *state.reads.entry(offset).or_default() += 1;
        if let Some(next) =
            state.scripts.get_mut(&offset).and_then(VecDeque::pop_front)
        {
            state.regs.insert(offset, next);
        }
        state.regs.get(&offset).copied().unwrap_or(0)
    }

    fn write32(&mut self, offset: usize, value: u32) {
        assert!(self.contains32(offset), "write of {:#x}", offset);
        self.state.borrow_mut().regs.insert(offset, value);
        self.journal.push(Event::Write {
            node: self.node,
            offset,
            value,
        });
    }
}

/// A fake `Clock` that can be made to fail.
pub struct Clock {
    journal: Journal,
    enable_error: Option<Errno>,
}

impl super::Clock for Clock {
    fn prepare_enable(&mut self) -> Result<(), Errno> {
        if let Some(e) = self.enable_error {
            return Err(e);
        }
        self.journal.push(Event::ClockEnable);
        Ok(())
    }

    fn disable_unprepare(&mut self) {
        self.journal.push(Event::ClockDisable);
    }
}

/// A fake `Delay` that records how long it was asked to sleep, without
/// actually sleeping.
#[derive(Clone)]
pub struct Delay {
    journal: Journal,
}

impl Delay {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl super::Delay for Delay {
    fn sleep(&self, duration: Duration) {
        self.journal.push(Event::Sleep(duration));
    }
}

/// A fake `Platform` with a fixed set of device nodes.
pub struct Platform {
    journal: Journal,
    regions: HashMap<Node, Region>,
    compatible: Vec<(String, Node)>,
    unmappable: HashSet<Node>,
    /// If set, `clock()` fails with this error.
    pub clock_error: Option<Errno>,
    /// If set, the clock's `prepare_enable()` fails with this error.
    pub clock_enable_error: Option<Errno>,
}

impl Platform {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            regions: HashMap::new(),
            compatible: Vec::new(),
            unmappable: HashSet::new(),
            clock_error: None,
            clock_enable_error: None,
        }
    }

    /// Adds a node with a register window, returning a handle to the
    /// window's registers.
    pub fn add_node(&mut self, node: Node, compatible: &str) -> Region {
        self.add_window(node, compatible, DEFAULT_WINDOW)
    }

    /// Like `add_node()`, but with a window of `len` bytes.
    pub fn add_window(
        &mut self,
        node: Node,
        compatible: &str,
        len: usize,
    ) -> Region {
        let region = Region::with_len(node, len, self.journal.clone());
        self.regions.insert(node, region.clone());
        self.compatible.push((compatible.to_string(), node));
        region
    }

    /// Makes `iomap()` fail for `node`.
    pub fn refuse_map(&mut self, node: Node) {
        self.unmappable.insert(node);
    }
}

impl super::Platform for Platform {
    type Mmio = Region;
    type Clock = Clock;
    type Delay = Delay;

    fn iomap(&mut self, node: Node) -> Option<Region> {
        if self.unmappable.contains(&node) {
            return None;
        }
        let region = self.regions.get(&node)?.clone();
        self.journal.push(Event::Map(node));
        Some(region)
    }

    fn iounmap(&mut self, mmio: Region) {
        self.journal.push(Event::Unmap(mmio.node));
    }

    fn find_compatible(&self, compatible: &str) -> Option<Node> {
        self.compatible
            .iter()
            .find(|(c, _)| c == compatible)
            .map(|(_, node)| *node)
    }

    fn compatible(&self, node: Node) -> Option<&str> {
        self.compatible
            .iter()
            .find(|(_, n)| *n == node)
            .map(|(c, _)| c.as_str())
    }

    fn clock(&mut self, _: Node) -> Result<Clock, Errno> {
        if let Some(e) = self.clock_error {
            return Err(e);
        }
        Ok(Clock {
            journal: self.journal.clone(),
            enable_error: self.clock_enable_error,
        })
    }

    fn delay(&self) -> Delay {
        Delay::new(self.journal.clone())
    }
}
