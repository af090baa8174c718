//! Pin to timer binding
//!
//! A [`RegisterBinding`] is everything a channel needs to drive one compare
//! output: the timer's control, compare, counter and interrupt registers, the
//! GPIO port the output shares, and the bit masks that connect, disconnect and
//! arm it. Bindings are plain values resolved from a [`Board`] table and never
//! change after construction.
//!
//! Addresses are data-space addresses from the ATmega328P and ATmega2560
//! datasheets (I/O registers below 0x60 already include the 0x20 offset).

use core::fmt;

use pulse_core::{CounterWidth, Timing};
use pulse_hal::{Level, PinId, RegAddr, RegisterBus};

/// Clock-select bits `CSn2:0` in control register B
const CS_MASK: u8 = 0b0000_0111;
/// `WGMn2` in TCCRnB of a 16-bit timer
const WGM_N2: u8 = 1 << 3;
/// `WGM21` in TCCR2A
const WGM_21: u8 = 1 << 1;

/// Hardware timer that owns a compare output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerId {
    Timer1,
    Timer2,
    Timer3,
    Timer4,
    Timer5,
}

impl TimerId {
    /// Number of timers a board can expose
    pub const COUNT: usize = 5;

    /// All timers in index order
    pub const ALL: [TimerId; Self::COUNT] = [
        Self::Timer1,
        Self::Timer2,
        Self::Timer3,
        Self::Timer4,
        Self::Timer5,
    ];

    /// Dense index for registry slots
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TIMER{}", self.index() + 1)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "TIMER{}", self.index() + 1);
    }
}

/// Register layout family of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerClass {
    /// 16-bit Timer1/3/4/5: CTC select lives in control register B
    Wide,
    /// 8-bit Timer2: CTC select lives in control register A
    Narrow,
}

impl TimerClass {
    pub const fn width(self) -> CounterWidth {
        match self {
            Self::Wide => CounterWidth::Bits16,
            Self::Narrow => CounterWidth::Bits8,
        }
    }

    /// CTC waveform bits as (control A, control B)
    const fn ctc_bits(self) -> (u8, u8) {
        match self {
            Self::Wide => (0, WGM_N2),
            Self::Narrow => (WGM_21, 0),
        }
    }
}

/// Compare output of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    A,
    B,
}

impl OutputChannel {
    /// `COMnx0`, the toggle-on-match bit
    const fn com_toggle(self) -> u8 {
        match self {
            Self::A => 1 << 6,
            Self::B => 1 << 4,
        }
    }

    /// `COMnx1 | COMnx0`
    const fn com_mask(self) -> u8 {
        match self {
            Self::A => 0b11 << 6,
            Self::B => 0b11 << 4,
        }
    }

    /// `OCIEnx` in TIMSKn, and `OCFnx` in TIFRn at the same position
    const fn irq_mask(self) -> u8 {
        match self {
            Self::A => 1 << 1,
            Self::B => 1 << 2,
        }
    }
}

/// Register block of one timer
#[derive(Debug, Clone, Copy)]
struct TimerBlock {
    id: TimerId,
    class: TimerClass,
    tccra: RegAddr,
    tccrb: RegAddr,
    tcnt: RegAddr,
    ocra: RegAddr,
    ocrb: RegAddr,
    timsk: RegAddr,
    tifr: RegAddr,
}

const TIMER1: TimerBlock = TimerBlock {
    id: TimerId::Timer1,
    class: TimerClass::Wide,
    tccra: 0x80,
    tccrb: 0x81,
    tcnt: 0x84,
    ocra: 0x88,
    ocrb: 0x8A,
    timsk: 0x6F,
    tifr: 0x36,
};

const TIMER2: TimerBlock = TimerBlock {
    id: TimerId::Timer2,
    class: TimerClass::Narrow,
    tccra: 0xB0,
    tccrb: 0xB1,
    tcnt: 0xB2,
    ocra: 0xB3,
    ocrb: 0xB4,
    timsk: 0x70,
    tifr: 0x37,
};

const TIMER3: TimerBlock = TimerBlock {
    id: TimerId::Timer3,
    class: TimerClass::Wide,
    tccra: 0x90,
    tccrb: 0x91,
    tcnt: 0x94,
    ocra: 0x98,
    ocrb: 0x9A,
    timsk: 0x71,
    tifr: 0x38,
};

const TIMER4: TimerBlock = TimerBlock {
    id: TimerId::Timer4,
    class: TimerClass::Wide,
    tccra: 0xA0,
    tccrb: 0xA1,
    tcnt: 0xA4,
    ocra: 0xA8,
    ocrb: 0xAA,
    timsk: 0x72,
    tifr: 0x39,
};

const TIMER5: TimerBlock = TimerBlock {
    id: TimerId::Timer5,
    class: TimerClass::Wide,
    tccra: 0x120,
    tccrb: 0x121,
    tcnt: 0x124,
    ocra: 0x128,
    ocrb: 0x12A,
    timsk: 0x73,
    tifr: 0x3A,
};

/// GPIO port as (PORTx, DDRx)
#[derive(Debug, Clone, Copy)]
struct Port {
    port: RegAddr,
    ddr: RegAddr,
}

const PORTB: Port = Port { port: 0x25, ddr: 0x24 };
const PORTE: Port = Port { port: 0x2E, ddr: 0x2D };
const PORTH: Port = Port { port: 0x102, ddr: 0x101 };
const PORTL: Port = Port { port: 0x10B, ddr: 0x10A };

/// Registers and masks for one timer compare output on one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterBinding {
    timer: TimerId,
    class: TimerClass,
    channel: OutputChannel,
    tccra: RegAddr,
    tccrb: RegAddr,
    tcnt: RegAddr,
    /// OCRnA, which sets the CTC period for both outputs
    top: RegAddr,
    /// Compare register of this output (equal to `top` for channel A)
    ocr: RegAddr,
    timsk: RegAddr,
    tifr: RegAddr,
    port: RegAddr,
    ddr: RegAddr,
    pin_mask: u8,
}

impl RegisterBinding {
    const fn new(block: TimerBlock, channel: OutputChannel, port: Port, bit: u8) -> Self {
        Self {
            timer: block.id,
            class: block.class,
            channel,
            tccra: block.tccra,
            tccrb: block.tccrb,
            tcnt: block.tcnt,
            top: block.ocra,
            ocr: match channel {
                OutputChannel::A => block.ocra,
                OutputChannel::B => block.ocrb,
            },
            timsk: block.timsk,
            tifr: block.tifr,
            port: port.port,
            ddr: port.ddr,
            pin_mask: 1 << bit,
        }
    }

    pub const fn timer(&self) -> TimerId {
        self.timer
    }

    pub const fn class(&self) -> TimerClass {
        self.class
    }

    pub const fn channel(&self) -> OutputChannel {
        self.channel
    }

    pub const fn width(&self) -> CounterWidth {
        self.class.width()
    }

    pub const fn port_register(&self) -> RegAddr {
        self.port
    }

    pub const fn pin_mask(&self) -> u8 {
        self.pin_mask
    }

    /// Control register A (pin action and, on Timer2, waveform bits)
    pub const fn control_a(&self) -> RegAddr {
        self.tccra
    }

    /// Control register B (clock select and, on 16-bit timers, waveform bits)
    pub const fn control_b(&self) -> RegAddr {
        self.tccrb
    }

    /// Interrupt-mask register of the timer
    pub const fn interrupt_mask_register(&self) -> RegAddr {
        self.timsk
    }

    /// Bit enabling this output's compare-match interrupt
    pub const fn interrupt_mask(&self) -> u8 {
        self.channel.irq_mask()
    }

    /// `COMnx1:0` bits in control register A; non-zero while the compare
    /// unit drives the pin, cleared to hand the pin back to its port latch
    pub const fn compare_output_mask(&self) -> u8 {
        self.channel.com_mask()
    }

    /// Make the pin an output so the compare unit can drive it
    pub fn configure_output<B: RegisterBus + ?Sized>(&self, bus: &B) {
        bus.set_bits(self.ddr, self.pin_mask);
    }

    /// Program CTC toggle mode and start the clock.
    ///
    /// Must run with interrupts masked. The clock-select bits are written
    /// last, so the counter starts only once everything else is in place.
    pub fn program<B: RegisterBus + ?Sized>(&self, bus: &B, timing: &Timing, interrupt: bool) {
        bus.write(self.tccra, 0);
        bus.write(self.tccrb, 0);

        self.write_counter(bus, 0);
        self.write_compare(bus, timing.compare);

        let (ctc_a, ctc_b) = self.class.ctc_bits();
        bus.set_bits(self.tccra, self.channel.com_toggle() | ctc_a);
        if ctc_b != 0 {
            bus.set_bits(self.tccrb, ctc_b);
        }

        // OCFnx is cleared by writing a one
        bus.write(self.tifr, self.channel.irq_mask());
        if interrupt {
            bus.set_bits(self.timsk, self.channel.irq_mask());
        }

        bus.set_bits(self.tccrb, timing.prescaler.clock_select());
    }

    /// Swap compare value and prescaler of a running timer
    pub fn retime<B: RegisterBus + ?Sized>(&self, bus: &B, timing: &Timing) {
        self.write_compare(bus, timing.compare);
        bus.update(self.tccrb, CS_MASK, timing.prescaler.clock_select());
    }

    /// Disconnect the pin, drive it LOW, stop the clock and mask the interrupt
    pub fn halt<B: RegisterBus + ?Sized>(&self, bus: &B) {
        bus.clear_bits(self.tccra, self.channel.com_mask());
        bus.clear_bits(self.port, self.pin_mask);
        bus.clear_bits(self.tccrb, CS_MASK);
        bus.clear_bits(self.timsk, self.channel.irq_mask());
    }

    /// Level the pin takes while disconnected from the timer
    pub fn idle_level<B: RegisterBus + ?Sized>(&self, bus: &B) -> Level {
        Level::from_port(bus.read(self.port), self.pin_mask)
    }

    /// Whether the compare-match interrupt of this output is enabled
    pub fn interrupt_enabled<B: RegisterBus + ?Sized>(&self, bus: &B) -> bool {
        bus.read(self.timsk) & self.channel.irq_mask() != 0
    }

    /// Whether the pin is connected to the compare unit
    pub fn connected<B: RegisterBus + ?Sized>(&self, bus: &B) -> bool {
        bus.read(self.tccra) & self.channel.com_mask() != 0
    }

    /// Whether the timer clock is selected
    pub fn clocked<B: RegisterBus + ?Sized>(&self, bus: &B) -> bool {
        bus.read(self.tccrb) & CS_MASK != 0
    }

    /// Compare value currently in this output's register
    pub fn compare<B: RegisterBus + ?Sized>(&self, bus: &B) -> u16 {
        match self.class {
            TimerClass::Wide => bus.read_wide(self.ocr),
            TimerClass::Narrow => u16::from(bus.read(self.ocr)),
        }
    }

    fn write_counter<B: RegisterBus + ?Sized>(&self, bus: &B, value: u16) {
        match self.class {
            TimerClass::Wide => bus.write_wide(self.tcnt, value),
            TimerClass::Narrow => bus.write(self.tcnt, value as u8),
        }
    }

    /// Channel B toggles at OCRnB but the counter clears at OCRnA, so both
    /// get the same value.
    fn write_compare<B: RegisterBus + ?Sized>(&self, bus: &B, value: u16) {
        match self.class {
            TimerClass::Wide => {
                bus.write_wide(self.top, value);
                if self.ocr != self.top {
                    bus.write_wide(self.ocr, value);
                }
            }
            TimerClass::Narrow => {
                bus.write(self.top, value as u8);
                if self.ocr != self.top {
                    bus.write(self.ocr, value as u8);
                }
            }
        }
    }
}

/// Board whose header pins map to timer outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    /// Uno, Nano and other ATmega328P boards
    Uno,
    /// Mega 2560
    Mega,
}

impl Board {
    /// Resolve a header pin to its compare output, if it has one
    pub const fn binding(self, pin: PinId) -> Option<RegisterBinding> {
        use OutputChannel::{A, B};

        let binding = match (self, pin) {
            (Board::Uno, 9) => RegisterBinding::new(TIMER1, A, PORTB, 1),
            (Board::Uno, 10) => RegisterBinding::new(TIMER1, B, PORTB, 2),
            (Board::Uno, 11) => RegisterBinding::new(TIMER2, A, PORTB, 3),
            (Board::Mega, 11) => RegisterBinding::new(TIMER1, A, PORTB, 5),
            (Board::Mega, 10) => RegisterBinding::new(TIMER2, A, PORTB, 4),
            (Board::Mega, 5) => RegisterBinding::new(TIMER3, A, PORTE, 3),
            (Board::Mega, 6) => RegisterBinding::new(TIMER4, A, PORTH, 3),
            (Board::Mega, 46) => RegisterBinding::new(TIMER5, A, PORTL, 3),
            _ => return None,
        };
        Some(binding)
    }

    /// Header pins with a usable compare output
    pub const fn output_pins(self) -> &'static [PinId] {
        match self {
            Board::Uno => &[9, 10, 11],
            Board::Mega => &[5, 6, 10, 11, 46],
        }
    }
}
