use pulse_core::{compute_timing, CounterWidth};
use pulse_hal::{Level, RegisterBus, SimBus};

use crate::binding::{Board, OutputChannel, TimerClass, TimerId};

const TCCR1A: u16 = 0x80;
const TCCR1B: u16 = 0x81;
const OCR1A: u16 = 0x88;
const OCR1B: u16 = 0x8A;
const TIMSK1: u16 = 0x6F;
const TCCR2A: u16 = 0xB0;
const TCCR2B: u16 = 0xB1;
const OCR2A: u16 = 0xB3;
const PORTB: u16 = 0x25;
const DDRB: u16 = 0x24;

#[test]
fn uno_pins_resolve_to_timer_outputs() {
    let pin9 = Board::Uno.binding(9).unwrap();
    assert_eq!(pin9.timer(), TimerId::Timer1);
    assert_eq!(pin9.channel(), OutputChannel::A);
    assert_eq!(pin9.width(), CounterWidth::Bits16);
    assert_eq!(pin9.pin_mask(), 1 << 1);

    let pin10 = Board::Uno.binding(10).unwrap();
    assert_eq!(pin10.timer(), TimerId::Timer1);
    assert_eq!(pin10.channel(), OutputChannel::B);

    let pin11 = Board::Uno.binding(11).unwrap();
    assert_eq!(pin11.timer(), TimerId::Timer2);
    assert_eq!(pin11.class(), TimerClass::Narrow);
    assert_eq!(pin11.width(), CounterWidth::Bits8);
}

#[test]
fn mega_pins_resolve_to_timer_outputs() {
    let expected = [
        (11, TimerId::Timer1, 0x25),
        (10, TimerId::Timer2, 0x25),
        (5, TimerId::Timer3, 0x2E),
        (6, TimerId::Timer4, 0x102),
        (46, TimerId::Timer5, 0x10B),
    ];
    for (pin, timer, port) in expected {
        let binding = Board::Mega.binding(pin).unwrap();
        assert_eq!(binding.timer(), timer, "pin {pin}");
        assert_eq!(binding.port_register(), port, "pin {pin}");
        assert_eq!(binding.channel(), OutputChannel::A);
    }
}

#[test]
fn pins_without_compare_output_do_not_resolve() {
    for pin in [0, 3, 5, 6, 13, 46, 255] {
        assert!(Board::Uno.binding(pin).is_none(), "uno pin {pin}");
    }
    for pin in [0, 2, 9, 13, 44, 45] {
        assert!(Board::Mega.binding(pin).is_none(), "mega pin {pin}");
    }
}

#[test]
fn listed_output_pins_all_resolve() {
    for board in [Board::Uno, Board::Mega] {
        for &pin in board.output_pins() {
            assert_eq!(board.binding(pin), board.binding(pin));
            assert!(board.binding(pin).is_some());
        }
    }
}

#[test]
fn accessors_expose_control_and_mask_registers() {
    let pin10 = Board::Uno.binding(10).unwrap();
    assert_eq!(pin10.control_a(), TCCR1A);
    assert_eq!(pin10.control_b(), TCCR1B);
    assert_eq!(pin10.interrupt_mask_register(), TIMSK1);
    assert_eq!(pin10.interrupt_mask(), 1 << 2); // OCIE1B
    assert_eq!(pin10.compare_output_mask(), 0b0011_0000); // COM1B1:0

    let pin11 = Board::Uno.binding(11).unwrap();
    assert_eq!(pin11.control_a(), TCCR2A);
    assert_eq!(pin11.control_b(), TCCR2B);
    assert_eq!(pin11.interrupt_mask_register(), 0x70); // TIMSK2
    assert_eq!(pin11.interrupt_mask(), 1 << 1); // OCIE2A
    assert_eq!(pin11.compare_output_mask(), 0b1100_0000); // COM2A1:0
}

#[test]
fn configure_output_sets_direction_bit_only() {
    let bus = SimBus::new();
    bus.write(DDRB, 0b0000_0001);
    Board::Uno.binding(9).unwrap().configure_output(&bus);
    assert_eq!(bus.read(DDRB), 0b0000_0011);
}

#[test]
fn program_wide_channel_a() {
    let bus = SimBus::new();
    let binding = Board::Uno.binding(9).unwrap();
    let timing = compute_timing(16_000_000, binding.width(), 1000).unwrap();

    binding.program(&bus, &timing, true);

    assert_eq!(bus.read(TCCR1A), 0b0100_0000); // COM1A0
    assert_eq!(bus.read(TCCR1B), 0b0000_1001); // WGM12 | CS10
    assert_eq!(bus.read_wide(OCR1A), 7999);
    assert_eq!(bus.read(TIMSK1), 0b0000_0010); // OCIE1A
    assert!(binding.clocked(&bus));
    assert!(binding.connected(&bus));
}

#[test]
fn program_last_write_starts_the_clock() {
    let bus = SimBus::new();
    let binding = Board::Uno.binding(9).unwrap();
    let timing = compute_timing(16_000_000, binding.width(), 30).unwrap();

    binding.program(&bus, &timing, false);

    assert_eq!(bus.last_write(), Some((TCCR1B, 0b0000_1010))); // WGM12 | CS11
    assert_eq!(bus.read(TIMSK1), 0);
}

#[test]
fn program_wide_channel_b_sets_both_compare_registers() {
    let bus = SimBus::new();
    let binding = Board::Uno.binding(10).unwrap();
    let timing = compute_timing(16_000_000, binding.width(), 2000).unwrap();

    binding.program(&bus, &timing, true);

    assert_eq!(bus.read(TCCR1A), 0b0001_0000); // COM1B0
    assert_eq!(bus.read_wide(OCR1A), 3999);
    assert_eq!(bus.read_wide(OCR1B), 3999);
    assert_eq!(binding.compare(&bus), 3999);
    assert_eq!(bus.read(TIMSK1), 0b0000_0100); // OCIE1B
}

#[test]
fn program_narrow_puts_ctc_in_control_a() {
    let bus = SimBus::new();
    let binding = Board::Uno.binding(11).unwrap();
    let timing = compute_timing(16_000_000, binding.width(), 1000).unwrap();

    binding.program(&bus, &timing, false);

    assert_eq!(bus.read(TCCR2A), 0b0100_0010); // COM2A0 | WGM21
    assert_eq!(bus.read(TCCR2B), 0b0000_0011); // clk/32
    assert_eq!(bus.read(OCR2A), 249);
    assert_eq!(binding.compare(&bus), 249);
}

#[test]
fn retime_swaps_compare_and_clock_only() {
    let bus = SimBus::new();
    let binding = Board::Uno.binding(9).unwrap();
    let fast = compute_timing(16_000_000, binding.width(), 1000).unwrap();
    let slow = compute_timing(16_000_000, binding.width(), 10).unwrap();

    binding.program(&bus, &fast, true);
    binding.retime(&bus, &slow);

    assert_eq!(binding.compare(&bus), slow.compare);
    assert_eq!(bus.read(TCCR1B), 0b0000_1000 | slow.prescaler.clock_select());
    assert_eq!(bus.read(TCCR1A), 0b0100_0000);
    assert!(binding.interrupt_enabled(&bus));
}

#[test]
fn halt_disconnects_and_parks_low() {
    let bus = SimBus::new();
    let binding = Board::Uno.binding(9).unwrap();
    let timing = compute_timing(16_000_000, binding.width(), 1000).unwrap();
    binding.program(&bus, &timing, true);
    bus.write(PORTB, 0b1000_0010);

    binding.halt(&bus);

    assert!(!binding.connected(&bus));
    assert!(!binding.clocked(&bus));
    assert!(!binding.interrupt_enabled(&bus));
    assert_eq!(bus.read(PORTB), 0b1000_0000);
    assert_eq!(binding.idle_level(&bus), Level::Low);
    // Waveform bits survive; only the clock is gone
    assert_eq!(bus.read(TCCR1B), 0b0000_1000);
}

#[test]
fn halt_leaves_other_timer_untouched() {
    let bus = SimBus::new();
    let wide = Board::Uno.binding(9).unwrap();
    let narrow = Board::Uno.binding(11).unwrap();
    let timing = compute_timing(16_000_000, narrow.width(), 1000).unwrap();
    narrow.program(&bus, &timing, false);

    wide.halt(&bus);

    assert!(narrow.clocked(&bus));
    assert!(narrow.connected(&bus));
    assert_eq!(bus.read(TCCR2B), 0b0000_0011);
}
