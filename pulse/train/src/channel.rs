//! Pulse-train channel
//!
//! A [`PulseTrain`] owns one timer compare output. In continuous mode the timer
//! toggles the pin on its own and the CPU is never involved. In discrete mode
//! every toggle raises a compare-match interrupt; the interrupt path counts the
//! toggles down and stops the timer after the last one, leaving the pin LOW.
//!
//! All state shared with the interrupt path sits behind a
//! [`critical_section::Mutex`], and every register sequence runs inside
//! `critical_section::with`, so the handler can never observe a
//! half-programmed timer.

use core::cell::RefCell;

use critical_section::Mutex;
use pulse_core::{
    compute_timing, CounterWidth, PulseError, PulseMode, PulseResult, RunState, Timing,
    DEFAULT_INPUT_CLOCK_HZ,
};
use pulse_hal::{InterruptHandler, Level, PinId, RegisterBus};

use crate::binding::{Board, RegisterBinding, TimerId};
use crate::registry::TimerRegistry;

/// Board and clock a channel is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub board: Board,
    pub input_clock_hz: u32,
}

impl ChannelConfig {
    pub const fn new(board: Board) -> Self {
        Self {
            board,
            input_clock_hz: DEFAULT_INPUT_CLOCK_HZ,
        }
    }

    pub const fn with_input_clock(mut self, input_clock_hz: u32) -> Self {
        self.input_clock_hz = input_clock_hz;
        self
    }
}

/// State shared between foreground calls and the interrupt handler
#[derive(Clone, Copy)]
struct ChannelState {
    /// Registry the channel attached to
    registry: Option<&'static TimerRegistry>,
    run: RunState,
    mode: PulseMode,
    /// Toggles requested by the last discrete `generate`
    pulse_target: u64,
    /// Toggles left before the automatic stop
    pulse_remaining: u64,
    timing: Option<Timing>,
    last_error: Option<PulseError>,
}

impl ChannelState {
    const fn new() -> Self {
        Self {
            registry: None,
            run: RunState::Idle,
            mode: PulseMode::Stopped,
            pulse_target: 0,
            pulse_remaining: 0,
            timing: None,
            last_error: None,
        }
    }

    /// Remember the outcome of a fallible call
    fn record(&mut self, result: PulseResult<()>) -> PulseResult<()> {
        self.last_error = result.err();
        result
    }
}

/// Square-wave generator bound to one pin
pub struct PulseTrain<B: RegisterBus> {
    pin: PinId,
    binding: Option<RegisterBinding>,
    input_clock_hz: u32,
    bus: B,
    state: Mutex<RefCell<ChannelState>>,
}

impl<B: RegisterBus> PulseTrain<B> {
    /// Resolve `pin` on the configured board.
    ///
    /// Touches no hardware, so it can initialise a `static`. A pin without a
    /// compare output yields a channel that is permanently invalid.
    pub const fn new(pin: PinId, config: ChannelConfig, bus: B) -> Self {
        Self {
            pin,
            binding: config.board.binding(pin),
            input_clock_hz: config.input_clock_hz,
            bus,
            state: Mutex::new(RefCell::new(ChannelState::new())),
        }
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Whether the pin resolved to a timer output
    pub fn is_valid(&self) -> bool {
        self.binding.is_some()
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.binding.as_ref().map(RegisterBinding::timer)
    }

    pub fn counter_width(&self) -> Option<CounterWidth> {
        self.binding.as_ref().map(RegisterBinding::width)
    }

    pub fn binding(&self) -> Option<&RegisterBinding> {
        self.binding.as_ref()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn input_clock_hz(&self) -> u32 {
        self.input_clock_hz
    }

    /// Make the pin an output and register this channel as the interrupt
    /// owner of its timer in `registry`.
    ///
    /// A channel previously registered for the same timer is evicted and
    /// stopped. Until a channel is attached, and again once it is evicted,
    /// `generate` and `update_frequency` fail.
    pub fn attach(&'static self, registry: &'static TimerRegistry) -> PulseResult<()>
    where
        B: 'static,
    {
        let result = match &self.binding {
            Some(binding) => {
                binding.configure_output(&self.bus);
                critical_section::with(|cs| {
                    self.state.borrow_ref_mut(cs).registry = Some(registry);
                });
                registry.register(binding.timer(), self);
                debug!("pin {} bound to {}", self.pin, binding.timer());
                Ok(())
            }
            None => {
                warn!("pin {} has no compare output", self.pin);
                Err(PulseError::InvalidPin)
            }
        };
        critical_section::with(|cs| self.state.borrow_ref_mut(cs).record(result))
    }

    /// Start a square wave at `frequency_hz`.
    ///
    /// In [`PulseMode::Discrete`] the timer stops by itself after `pulses`
    /// HIGH pulses (two toggles each); `pulses` is ignored otherwise. Fails
    /// without touching any register if the channel is invalid, does not own
    /// its timer, is already running, or the request cannot be met.
    pub fn generate(&self, frequency_hz: u32, mode: PulseMode, pulses: u32) -> PulseResult<()> {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            let result = self.start(&mut state, frequency_hz, mode, pulses);
            if let Err(err) = result {
                warn!("pin {}: generate rejected: {}", self.pin, err);
            }
            state.record(result)
        })
    }

    /// Retune a running channel, keeping its mode and remaining pulses
    pub fn update_frequency(&self, frequency_hz: u32) -> PulseResult<()> {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            let result = self.retime(&mut state, frequency_hz);
            if let Err(err) = result {
                warn!("pin {}: frequency update rejected: {}", self.pin, err);
            }
            state.record(result)
        })
    }

    /// Stop the wave and park the pin LOW. Safe to call when already stopped.
    pub fn stop(&self) {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            self.halt(&mut state);
        });
        debug!("pin {}: stopped", self.pin);
    }

    /// Count one toggle of a discrete pulse train.
    ///
    /// Called from the timer's compare-match interrupt. Stops the timer when
    /// the last toggle has been counted; does nothing in any other mode.
    pub fn handle_interrupt(&self) {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            if state.run != RunState::Running
                || state.mode != PulseMode::Discrete
                || state.pulse_remaining == 0
            {
                return;
            }

            state.pulse_remaining -= 1;
            if state.pulse_remaining == 0 {
                self.halt(&mut state);
                trace!("pin {}: pulse train complete", self.pin);
            }
        });
    }

    pub fn is_running(&self) -> bool {
        self.with_state(|state| state.run == RunState::Running)
    }

    pub fn run_state(&self) -> RunState {
        self.with_state(|state| state.run)
    }

    pub fn mode(&self) -> PulseMode {
        self.with_state(|state| state.mode)
    }

    /// Toggles left in the current discrete train
    pub fn pulses_remaining(&self) -> u64 {
        self.with_state(|state| state.pulse_remaining)
    }

    /// Toggles requested by the last discrete train
    pub fn pulse_target(&self) -> u64 {
        self.with_state(|state| state.pulse_target)
    }

    /// Timing last written to the timer
    pub fn timing(&self) -> Option<Timing> {
        self.with_state(|state| state.timing)
    }

    /// Whether this channel currently owns its timer's interrupt
    pub fn owns_timer(&self) -> bool {
        self.with_state(|state| self.check_owner(state).is_ok())
    }

    /// Most recent failure; cleared by the next successful call
    pub fn last_error(&self) -> Option<PulseError> {
        self.with_state(|state| state.last_error)
    }

    /// Level of the pin while disconnected from the timer
    pub fn idle_level(&self) -> Option<Level> {
        self.binding.as_ref().map(|binding| binding.idle_level(&self.bus))
    }

    fn with_state<R>(&self, f: impl FnOnce(&ChannelState) -> R) -> R {
        critical_section::with(|cs| f(&*self.state.borrow_ref(cs)))
    }

    /// The channel may only program a timer whose vector reaches it
    fn check_owner(&self, state: &ChannelState) -> PulseResult<&RegisterBinding> {
        let binding = self.binding.as_ref().ok_or(PulseError::InvalidPin)?;
        let registry = state.registry.ok_or(PulseError::NotAttached)?;
        if !registry.is_owner(binding.timer(), self) {
            return Err(PulseError::TimerTaken);
        }
        Ok(binding)
    }

    fn start(
        &self,
        state: &mut ChannelState,
        frequency_hz: u32,
        mode: PulseMode,
        pulses: u32,
    ) -> PulseResult<()> {
        let binding = self.check_owner(state)?;
        if state.run == RunState::Running {
            return Err(PulseError::AlreadyActive);
        }
        if frequency_hz == 0 {
            return Err(PulseError::ZeroFrequency);
        }
        if !mode.is_generating() {
            return Err(PulseError::InvalidMode);
        }
        if mode == PulseMode::Discrete && pulses == 0 {
            return Err(PulseError::ZeroPulses);
        }
        let timing = compute_timing(self.input_clock_hz, binding.width(), frequency_hz)?;

        let toggles = match mode {
            PulseMode::Discrete => u64::from(pulses) * 2,
            _ => 0,
        };
        state.mode = mode;
        state.pulse_target = toggles;
        state.pulse_remaining = toggles;
        state.timing = Some(timing);

        binding.program(&self.bus, &timing, mode == PulseMode::Discrete);
        state.run = RunState::Running;

        debug!(
            "pin {}: {} Hz {} on {} ({})",
            self.pin,
            frequency_hz,
            mode,
            binding.timer(),
            timing
        );
        Ok(())
    }

    fn retime(&self, state: &mut ChannelState, frequency_hz: u32) -> PulseResult<()> {
        let binding = self.check_owner(state)?;
        if state.run != RunState::Running {
            return Err(PulseError::NotRunning);
        }
        let timing = compute_timing(self.input_clock_hz, binding.width(), frequency_hz)?;

        binding.retime(&self.bus, &timing);
        state.timing = Some(timing);

        debug!("pin {}: retuned to {} Hz ({})", self.pin, frequency_hz, timing);
        Ok(())
    }

    fn halt(&self, state: &mut ChannelState) {
        if let Some(binding) = &self.binding {
            binding.halt(&self.bus);
        }
        state.run = RunState::Idle;
        state.mode = PulseMode::Stopped;
        state.pulse_remaining = 0;
    }
}

impl<B: RegisterBus> InterruptHandler for PulseTrain<B> {
    fn on_interrupt(&self) {
        self.handle_interrupt();
    }

    /// Stop a running wave before the new owner reprograms the shared timer
    fn on_evicted(&self) {
        let was_running = critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            let running = state.run == RunState::Running;
            if running {
                self.halt(&mut state);
            }
            running
        });
        if was_running {
            warn!("pin {}: evicted while running, stopped", self.pin);
        }
    }
}
