//! Byte-wide peripheral register access

/// Data-space address of an I/O register
pub type RegAddr = u16;

/// Peripheral register bus (object-safe)
///
/// Writes are assumed to always succeed; there is no read-back verification.
pub trait RegisterBus: Sync {
    /// Read an 8-bit register
    fn read(&self, addr: RegAddr) -> u8;

    /// Write an 8-bit register
    fn write(&self, addr: RegAddr, value: u8);

    /// Read-modify-write: clear the bits in `clear`, then set the bits in `set`
    fn update(&self, addr: RegAddr, clear: u8, set: u8) {
        let value = self.read(addr);
        self.write(addr, (value & !clear) | set);
    }

    /// Set the bits in `mask`
    fn set_bits(&self, addr: RegAddr, mask: u8) {
        self.update(addr, 0, mask);
    }

    /// Clear the bits in `mask`
    fn clear_bits(&self, addr: RegAddr, mask: u8) {
        self.update(addr, mask, 0);
    }

    /// Write a 16-bit register pair at `addr` (low) and `addr + 1` (high).
    ///
    /// The high byte goes first: AVR latches it in the shared TEMP register
    /// and commits both bytes on the low-byte write.
    fn write_wide(&self, addr: RegAddr, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.write(addr + 1, high);
        self.write(addr, low);
    }

    /// Read a 16-bit register pair, low byte first
    fn read_wide(&self, addr: RegAddr) -> u16 {
        let low = self.read(addr);
        let high = self.read(addr + 1);
        u16::from_le_bytes([low, high])
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    fn read(&self, addr: RegAddr) -> u8 {
        (**self).read(addr)
    }

    fn write(&self, addr: RegAddr, value: u8) {
        (**self).write(addr, value)
    }
}
