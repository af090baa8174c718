//! Host-side stand-ins for the board and the timer hardware

#![allow(dead_code)]

use pulse_hal::{Level, RegisterBus, SimBus};
use pulse_train::{Board, ChannelConfig, PulseTrain, TimerRegistry};

pub type SimChannel = PulseTrain<&'static SimBus>;

pub fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

/// Fresh registry, private to one test
pub fn registry() -> &'static TimerRegistry {
    leak(TimerRegistry::new())
}

/// Unattached channel on its own simulated register file
pub fn channel(board: Board, pin: u8) -> &'static SimChannel {
    channel_on(leak(SimBus::new()), board, pin)
}

/// Unattached channel sharing `bus` with other channels
pub fn channel_on(bus: &'static SimBus, board: Board, pin: u8) -> &'static SimChannel {
    leak(PulseTrain::new(pin, ChannelConfig::new(board), bus))
}

/// Channel on its own register file, attached to `registry`
pub fn attached(registry: &'static TimerRegistry, board: Board, pin: u8) -> &'static SimChannel {
    let ch = channel(board, pin);
    ch.attach(registry).expect("pin has a compare output");
    ch
}

/// Compare-match unit of the timer behind one channel.
///
/// Each [`fire`](Self::fire) stands for the counter reaching the compare
/// value: the output toggles if the pin is connected and the vector runs if
/// the interrupt is enabled.
pub struct CompareMatch<'a> {
    channel: &'a SimChannel,
    registry: &'a TimerRegistry,
    output: Level,
    pub toggles: usize,
    pub interrupts: usize,
}

impl<'a> CompareMatch<'a> {
    pub fn new(channel: &'a SimChannel, registry: &'a TimerRegistry) -> Self {
        Self {
            channel,
            registry,
            output: Level::Low,
            toggles: 0,
            interrupts: 0,
        }
    }

    /// One compare-match event; `false` if the timer clock is stopped
    pub fn fire(&mut self) -> bool {
        let binding = self.channel.binding().expect("bound channel");
        let bus = *self.channel.bus();
        if !binding.clocked(bus) {
            return false;
        }
        if self.connected() {
            self.output = self.output.toggled();
            self.toggles += 1;
        }
        if bus.read(binding.interrupt_mask_register()) & binding.interrupt_mask() != 0 {
            self.interrupts += 1;
            self.registry.dispatch(binding.timer());
        }
        true
    }

    /// Fire until the clock stops, at most `limit` times
    pub fn run(&mut self, limit: usize) -> usize {
        let mut events = 0;
        while events < limit && self.fire() {
            events += 1;
        }
        events
    }

    /// Level on the pin: the compare output while connected, else the port latch
    pub fn pin_level(&self) -> Level {
        let binding = self.channel.binding().expect("bound channel");
        if self.connected() {
            self.output
        } else {
            binding.idle_level(*self.channel.bus())
        }
    }

    /// Level the compare output flip-flop holds
    pub fn output(&self) -> Level {
        self.output
    }

    fn connected(&self) -> bool {
        let binding = self.channel.binding().expect("bound channel");
        self.channel.bus().read(binding.control_a()) & binding.compare_output_mask() != 0
    }
}
