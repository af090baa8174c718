//! Memory-mapped register access

use pulse_hal::{RegAddr, RegisterBus};

/// The MCU's own data space
///
/// Every I/O register of the ATmega328P and ATmega2560 is reachable through
/// a plain data-space address, so the bus carries no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mmio;

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read(&self, addr: RegAddr) -> u8 {
        // SAFETY: callers only pass register addresses from the board tables,
        // which are valid, aligned and always mapped.
        unsafe { core::ptr::read_volatile(usize::from(addr) as *const u8) }
    }

    #[inline(always)]
    fn write(&self, addr: RegAddr, value: u8) {
        // SAFETY: see `read`.
        unsafe { core::ptr::write_volatile(usize::from(addr) as *mut u8, value) }
    }
}
