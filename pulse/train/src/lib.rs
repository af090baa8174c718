#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # Pulse Train
//!
//! Square waves and exact pulse counts on AVR compare-match timers.
//!
//! A [`PulseTrain`] binds one header pin to the timer output that can toggle
//! it, picks the prescaler and compare value for a requested frequency, and
//! either lets the timer free-run ([`PulseMode::Continuous`]) or counts the
//! toggles in the compare-match interrupt and stops after the requested
//! number of pulses ([`PulseMode::Discrete`]).
//!
//! ## Module Overview
//! - [`binding`]  – pin → timer register binding and board tables.
//! - [`channel`]  – the generate/stop state machine and interrupt handler.
//! - [`registry`] – timer → channel lookup used by the interrupt vectors.
//!
//! ```rust,ignore
//! static TONE: PulseTrain<Mmio> = PulseTrain::new(9, ChannelConfig::new(Board::Uno), Mmio);
//!
//! TONE.attach(&REGISTRY)?;
//! TONE.generate(1000, PulseMode::Discrete, 10)?;
//! ```

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod binding;
pub mod channel;
pub mod registry;

pub use binding::{Board, OutputChannel, RegisterBinding, TimerClass, TimerId};
pub use channel::{ChannelConfig, PulseTrain};
pub use registry::{dispatch, TimerRegistry, REGISTRY};

pub use pulse_core::{
    compute_timing, CounterWidth, Prescaler, PulseError, PulseMode, PulseResult, RunState,
    Timing, DEFAULT_INPUT_CLOCK_HZ,
};

#[cfg(test)]
mod tests;
