#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # Pulse Core
//!
//! Core types and the timing search for driving a square wave out of a
//! compare-match timer. Everything here is pure: no register is touched, so
//! the prescaler/compare selection can be checked on the host.

use core::fmt;

pub mod mode;
pub mod timing;

pub use mode::*;
pub use timing::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Timer input clock of a stock 16 MHz Uno or Mega
pub const DEFAULT_INPUT_CLOCK_HZ: u32 = 16_000_000;

/// Result type used throughout the pulse-train crates
pub type PulseResult<T> = Result<T, PulseError>;

/// Reasons a pulse-train request is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseError {
    /// Pin has no compare-match output
    InvalidPin,
    /// `generate` called while the channel is running
    AlreadyActive,
    /// Requested frequency is zero
    ZeroFrequency,
    /// Discrete mode requested with zero pulses
    ZeroPulses,
    /// Mode is not one that generates a wave
    InvalidMode,
    /// No prescaler/compare combination reaches the frequency
    FrequencyOutOfRange,
    /// Frequency update requested on an idle channel
    NotRunning,
    /// Channel was never attached to a timer registry
    NotAttached,
    /// Another channel has since claimed this channel's timer
    TimerTaken,
}

impl fmt::Display for PulseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PulseError::InvalidPin => write!(f, "Pin is not timer-capable"),
            PulseError::AlreadyActive => write!(f, "Pulse train already active"),
            PulseError::ZeroFrequency => write!(f, "Frequency must be non-zero"),
            PulseError::ZeroPulses => write!(f, "Discrete mode needs at least one pulse"),
            PulseError::InvalidMode => write!(f, "Invalid pulse mode"),
            PulseError::FrequencyOutOfRange => write!(f, "Frequency out of range for timer"),
            PulseError::NotRunning => write!(f, "Pulse train is not running"),
            PulseError::NotAttached => write!(f, "Channel is not attached"),
            PulseError::TimerTaken => write!(f, "Timer owned by another channel"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PulseError {}

#[cfg(feature = "defmt")]
impl defmt::Format for PulseError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PulseError::InvalidPin => defmt::write!(fmt, "InvalidPin"),
            PulseError::AlreadyActive => defmt::write!(fmt, "AlreadyActive"),
            PulseError::ZeroFrequency => defmt::write!(fmt, "ZeroFrequency"),
            PulseError::ZeroPulses => defmt::write!(fmt, "ZeroPulses"),
            PulseError::InvalidMode => defmt::write!(fmt, "InvalidMode"),
            PulseError::FrequencyOutOfRange => defmt::write!(fmt, "FrequencyOutOfRange"),
            PulseError::NotRunning => defmt::write!(fmt, "NotRunning"),
            PulseError::NotAttached => defmt::write!(fmt, "NotAttached"),
            PulseError::TimerTaken => defmt::write!(fmt, "TimerTaken"),
        }
    }
}
