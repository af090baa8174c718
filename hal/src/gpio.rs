//! GPIO pin identifiers and levels

/// Board-level pin number as printed on the header (e.g. `9` for D9)
pub type PinId = u8;

/// GPIO pin levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl Level {
    /// Level of the bits selected by `mask` in a port register value
    pub const fn from_port(value: u8, mask: u8) -> Self {
        if value & mask != 0 {
            Self::High
        } else {
            Self::Low
        }
    }

    /// Opposite level
    pub const fn toggled(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Level {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Low => defmt::write!(fmt, "Low"),
            Self::High => defmt::write!(fmt, "High"),
        }
    }
}
