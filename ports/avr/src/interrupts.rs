//! Compare-match interrupt vectors
//!
//! Each vector forwards to [`pulse_train::dispatch`], which hands the event
//! to whichever channel last attached to that timer. The handlers are only
//! compiled for the AVR target with the `rt` feature; the table below
//! describes them on every target.

use pulse_train::TimerId;

/// One compare-match vector and the timer it reports for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareVector {
    pub name: &'static str,
    pub timer: TimerId,
}

const fn vector(name: &'static str, timer: TimerId) -> CompareVector {
    CompareVector { name, timer }
}

/// Vectors installed on the ATmega328P
pub const ATMEGA328P_VECTORS: &[CompareVector] = &[
    vector("TIMER1_COMPA", TimerId::Timer1),
    vector("TIMER1_COMPB", TimerId::Timer1),
    vector("TIMER2_COMPA", TimerId::Timer2),
];

/// Vectors installed on the ATmega2560
pub const ATMEGA2560_VECTORS: &[CompareVector] = &[
    vector("TIMER1_COMPA", TimerId::Timer1),
    vector("TIMER2_COMPA", TimerId::Timer2),
    vector("TIMER3_COMPA", TimerId::Timer3),
    vector("TIMER4_COMPA", TimerId::Timer4),
    vector("TIMER5_COMPA", TimerId::Timer5),
];

#[cfg(all(target_arch = "avr", feature = "rt", feature = "atmega328p"))]
mod atmega328p {
    use pulse_train::{dispatch, TimerId};

    #[avr_device::interrupt(atmega328p)]
    fn TIMER1_COMPA() {
        dispatch(TimerId::Timer1);
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER1_COMPB() {
        dispatch(TimerId::Timer1);
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER2_COMPA() {
        dispatch(TimerId::Timer2);
    }
}

#[cfg(all(target_arch = "avr", feature = "rt", feature = "atmega2560"))]
mod atmega2560 {
    use pulse_train::{dispatch, TimerId};

    #[avr_device::interrupt(atmega2560)]
    fn TIMER1_COMPA() {
        dispatch(TimerId::Timer1);
    }

    #[avr_device::interrupt(atmega2560)]
    fn TIMER2_COMPA() {
        dispatch(TimerId::Timer2);
    }

    #[avr_device::interrupt(atmega2560)]
    fn TIMER3_COMPA() {
        dispatch(TimerId::Timer3);
    }

    #[avr_device::interrupt(atmega2560)]
    fn TIMER4_COMPA() {
        dispatch(TimerId::Timer4);
    }

    #[avr_device::interrupt(atmega2560)]
    fn TIMER5_COMPA() {
        dispatch(TimerId::Timer5);
    }
}
