//! Prescaler and compare-value selection
//!
//! A timer in CTC mode counts at `input_clock / prescaler` and toggles its
//! output every time the counter reaches the compare value, so the wave on the
//! pin runs at
//!
//! ```text
//! f = input_clock / (2 * prescaler * (compare + 1))
//! ```
//!
//! [`compute_timing`] walks the prescalers of a timer from the smallest
//! divider up and keeps the first one whose compare value fits the counter.
//! Smaller dividers mean finer steps between neighbouring frequencies.

use core::fmt;

use crate::{PulseError, PulseResult};

/// Clock divider together with the clock-select code that enables it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prescaler {
    divider: u16,
    clock_select: u8,
}

impl Prescaler {
    const fn new(divider: u16, clock_select: u8) -> Self {
        Self {
            divider,
            clock_select,
        }
    }

    /// Division ratio applied to the input clock
    pub const fn divider(self) -> u16 {
        self.divider
    }

    /// Value for the `CSn2:0` bits of control register B
    pub const fn clock_select(self) -> u8 {
        self.clock_select
    }
}

impl fmt::Display for Prescaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clk/{}", self.divider)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Prescaler {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "clk/{}", self.divider);
    }
}

/// Timer1/3/4/5 clock sources (no clk/32 or clk/128)
const PRESCALERS_16: [Prescaler; 5] = [
    Prescaler::new(1, 0b001),
    Prescaler::new(8, 0b010),
    Prescaler::new(64, 0b011),
    Prescaler::new(256, 0b100),
    Prescaler::new(1024, 0b101),
];

/// Timer2 clock sources
const PRESCALERS_8: [Prescaler; 7] = [
    Prescaler::new(1, 0b001),
    Prescaler::new(8, 0b010),
    Prescaler::new(32, 0b011),
    Prescaler::new(64, 0b100),
    Prescaler::new(128, 0b101),
    Prescaler::new(256, 0b110),
    Prescaler::new(1024, 0b111),
];

/// Width of a timer's counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterWidth {
    Bits8,
    Bits16,
}

impl CounterWidth {
    /// Number of counter bits
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits8 => 8,
            Self::Bits16 => 16,
        }
    }

    /// Largest value the compare register holds
    pub const fn max_compare(self) -> u16 {
        match self {
            Self::Bits8 => u8::MAX as u16,
            Self::Bits16 => u16::MAX,
        }
    }

    /// Available prescalers in ascending divider order
    pub const fn prescalers(self) -> &'static [Prescaler] {
        match self {
            Self::Bits8 => &PRESCALERS_8,
            Self::Bits16 => &PRESCALERS_16,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CounterWidth {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}-bit", self.bits());
    }
}

/// Register values that produce a frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Compare register value
    pub compare: u16,
    /// Clock divider
    pub prescaler: Prescaler,
}

impl Timing {
    /// Output frequency these values actually produce, truncated to whole hertz
    pub fn achieved_hz(&self, input_clock_hz: u32) -> u32 {
        let period = 2 * u64::from(self.prescaler.divider()) * (u64::from(self.compare) + 1);
        (u64::from(input_clock_hz) / period) as u32
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} compare={}", self.prescaler, self.compare)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Timing {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} compare={}", self.prescaler, self.compare);
    }
}

/// Find the prescaler and compare value for `frequency_hz`.
///
/// Integer division truncates; the achieved frequency can sit slightly above
/// the request and no rounding correction is applied.
pub fn compute_timing(
    input_clock_hz: u32,
    width: CounterWidth,
    frequency_hz: u32,
) -> PulseResult<Timing> {
    if frequency_hz == 0 {
        return Err(PulseError::ZeroFrequency);
    }

    let max_compare = u64::from(width.max_compare());
    width
        .prescalers()
        .iter()
        .find_map(|&prescaler| {
            let half_period =
                u64::from(input_clock_hz) / (2 * u64::from(prescaler.divider()) * u64::from(frequency_hz));
            // A zero half period means the frequency is above clock/2 for this divider
            let compare = half_period.checked_sub(1)?;
            (compare <= max_compare).then_some(Timing {
                compare: compare as u16,
                prescaler,
            })
        })
        .ok_or(PulseError::FrequencyOutOfRange)
}
