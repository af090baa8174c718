//! Output modes and channel run state

use core::fmt;

use crate::PulseError;

/// What the timer output is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PulseMode {
    /// No wave; the pin is parked LOW
    #[default]
    Stopped = 0,
    /// A fixed number of pulses, then stop
    Discrete = 1,
    /// Free-running wave until stopped
    Continuous = 2,
}

impl PulseMode {
    /// Raw mode code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether `generate` accepts this mode
    pub const fn is_generating(self) -> bool {
        matches!(self, Self::Discrete | Self::Continuous)
    }
}

impl TryFrom<u8> for PulseMode {
    type Error = PulseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Stopped),
            1 => Ok(Self::Discrete),
            2 => Ok(Self::Continuous),
            _ => Err(PulseError::InvalidMode),
        }
    }
}

impl fmt::Display for PulseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Discrete => write!(f, "discrete"),
            Self::Continuous => write!(f, "continuous"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PulseMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Stopped => defmt::write!(fmt, "Stopped"),
            Self::Discrete => defmt::write!(fmt, "Discrete"),
            Self::Continuous => defmt::write!(fmt, "Continuous"),
        }
    }
}

/// Whether the timer clock is currently running for a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

#[cfg(feature = "defmt")]
impl defmt::Format for RunState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(fmt, "Idle"),
            Self::Running => defmt::write!(fmt, "Running"),
        }
    }
}
