#![no_std]

//! AVR port for the pulse-train driver.
//!
//! Provides the memory-mapped register bus, the board matching the compiled
//! MCU and the compare-match vectors that feed the global
//! [`REGISTRY`](pulse_train::REGISTRY).
//!
//! ```rust,ignore
//! use pulse_avr::{attach, Channel, PortConfig};
//!
//! static TONE: Channel = PortConfig::new().channel(9);
//!
//! attach(&TONE)?;
//! TONE.generate(440, PulseMode::Continuous, 0)?;
//! ```

#[cfg(all(feature = "atmega328p", feature = "atmega2560"))]
compile_error!("select exactly one of `atmega328p` and `atmega2560`");

pub mod interrupts;
pub mod mmio;

pub use interrupts::CompareVector;
pub use mmio::Mmio;

use pulse_train::{
    Board, ChannelConfig, PulseResult, PulseTrain, DEFAULT_INPUT_CLOCK_HZ, REGISTRY,
};

/// Channel driving the MCU's own registers
pub type Channel = PulseTrain<Mmio>;

/// Board of the compiled MCU
#[cfg(feature = "atmega2560")]
pub const BOARD: Board = Board::Mega;
#[cfg(not(feature = "atmega2560"))]
pub const BOARD: Board = Board::Uno;

/// Compare-match vectors installed for [`BOARD`]
pub const fn vectors() -> &'static [CompareVector] {
    match BOARD {
        Board::Uno => interrupts::ATMEGA328P_VECTORS,
        Board::Mega => interrupts::ATMEGA2560_VECTORS,
    }
}

/// Clock a firmware image builds its channels with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfig {
    pub input_clock_hz: u32,
}

impl PortConfig {
    pub const fn new() -> Self {
        Self {
            input_clock_hz: DEFAULT_INPUT_CLOCK_HZ,
        }
    }

    /// Boards clocked from a different crystal (e.g. 8 MHz Pro Mini)
    pub const fn with_input_clock(mut self, input_clock_hz: u32) -> Self {
        self.input_clock_hz = input_clock_hz;
        self
    }

    pub const fn channel_config(&self) -> ChannelConfig {
        ChannelConfig::new(BOARD).with_input_clock(self.input_clock_hz)
    }

    /// Channel for a header pin, suitable for a `static`
    pub const fn channel(&self, pin: u8) -> Channel {
        PulseTrain::new(pin, self.channel_config(), Mmio)
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach `channel` to the registry the port's vectors dispatch through
pub fn attach(channel: &'static Channel) -> PulseResult<()> {
    channel.attach(&REGISTRY)
}

#[cfg(test)]
extern crate std;
