//! In-memory register file for host testing
//!
//! `SimBus` stores every register in a flat byte array guarded by a critical
//! section, so it can be shared between a test's "foreground" code and the
//! emulated interrupt path. It has no peripheral behaviour of its own: writes
//! land verbatim and reads return the last value written.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;

use crate::register::{RegAddr, RegisterBus};

/// Size of the simulated data space; covers the extended I/O range of the
/// ATmega2560 (Timer5 lives at 0x120).
pub const SIM_SPACE: usize = 0x200;

/// Simulated register bus
pub struct SimBus {
    mem: Mutex<RefCell<[u8; SIM_SPACE]>>,
    writes: Mutex<Cell<usize>>,
    last_write: Mutex<Cell<Option<(RegAddr, u8)>>>,
}

impl SimBus {
    /// Create a register file with every register cleared
    pub const fn new() -> Self {
        Self {
            mem: Mutex::new(RefCell::new([0; SIM_SPACE])),
            writes: Mutex::new(Cell::new(0)),
            last_write: Mutex::new(Cell::new(None)),
        }
    }

    /// Copy of the whole register file
    pub fn snapshot(&self) -> [u8; SIM_SPACE] {
        critical_section::with(|cs| *self.mem.borrow_ref(cs))
    }

    /// Number of writes performed through the bus
    pub fn writes(&self) -> usize {
        critical_section::with(|cs| self.writes.borrow(cs).get())
    }

    /// Most recent write, if any
    pub fn last_write(&self) -> Option<(RegAddr, u8)> {
        critical_section::with(|cs| self.last_write.borrow(cs).get())
    }

    /// Store a value without counting it as a driver write (hardware side)
    pub fn poke(&self, addr: RegAddr, value: u8) {
        critical_section::with(|cs| {
            if let Some(slot) = self.mem.borrow_ref_mut(cs).get_mut(addr as usize) {
                *slot = value;
            }
        });
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimBus {
    fn read(&self, addr: RegAddr) -> u8 {
        critical_section::with(|cs| {
            self.mem
                .borrow_ref(cs)
                .get(addr as usize)
                .copied()
                .unwrap_or(0)
        })
    }

    fn write(&self, addr: RegAddr, value: u8) {
        critical_section::with(|cs| {
            if let Some(slot) = self.mem.borrow_ref_mut(cs).get_mut(addr as usize) {
                *slot = value;
            }
            let writes = self.writes.borrow(cs);
            writes.set(writes.get() + 1);
            self.last_write.borrow(cs).set(Some((addr, value)));
        });
    }
}
