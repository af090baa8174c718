//! Hardware seams for compare-match timer drivers
//!
//! This crate defines the narrow interfaces a pulse-train driver needs from
//! the platform: byte-wide register access, pin levels, and the receiver side
//! of a timer interrupt. With the `sim` feature it also provides an in-memory
//! register file for host testing.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod gpio;
pub mod interrupt;
pub mod register;

#[cfg(feature = "sim")]
pub mod sim;

// Re-export commonly used types
pub use gpio::{Level, PinId};
pub use interrupt::InterruptHandler;
pub use register::{RegAddr, RegisterBus};

#[cfg(feature = "sim")]
pub use sim::SimBus;
