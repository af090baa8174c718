//! Timer interrupt registry for compare-match dispatch

use core::cell::Cell;

use critical_section::Mutex;
use pulse_hal::InterruptHandler;

use crate::binding::TimerId;

type Slot = Mutex<Cell<Option<&'static dyn InterruptHandler>>>;

/// Owner of each timer's compare-match interrupt
///
/// One slot per [`TimerId`]. Slots are filled when a channel attaches and are
/// never cleared. Registering a timer that already has an owner replaces the
/// old owner (last writer wins) and tells it through
/// [`InterruptHandler::on_evicted`], after which it receives no interrupts.
pub struct TimerRegistry {
    slots: [Slot; TimerId::COUNT],
}

impl TimerRegistry {
    /// Create a new empty registry
    pub const fn new() -> Self {
        const EMPTY: Slot = Mutex::new(Cell::new(None));
        Self {
            slots: [EMPTY; TimerId::COUNT],
        }
    }

    /// Make `handler` the owner of `timer`, returning the evicted owner.
    ///
    /// Re-registering the current owner is a no-op.
    pub fn register(
        &self,
        timer: TimerId,
        handler: &'static dyn InterruptHandler,
    ) -> Option<&'static dyn InterruptHandler> {
        let previous = critical_section::with(|cs| {
            self.slots[timer.index()].borrow(cs).replace(Some(handler))
        });
        if let Some(previous) = previous {
            if !same_handler(previous, handler) {
                warn!("{} owner replaced", timer);
                previous.on_evicted();
            }
        }
        previous
    }

    /// Current owner of `timer`
    pub fn owner(&self, timer: TimerId) -> Option<&'static dyn InterruptHandler> {
        critical_section::with(|cs| self.slots[timer.index()].borrow(cs).get())
    }

    /// Whether `handler` currently owns `timer`
    pub fn is_owner(&self, timer: TimerId, handler: &dyn InterruptHandler) -> bool {
        self.owner(timer)
            .is_some_and(|owner| same_handler(owner, handler))
    }

    /// Forward one compare-match event of `timer` to its owner.
    ///
    /// Called from the timer's interrupt vector. A timer without an owner
    /// ignores the event.
    pub fn dispatch(&self, timer: TimerId) {
        if let Some(handler) = self.owner(timer) {
            handler.on_interrupt();
        }
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn same_handler(a: &dyn InterruptHandler, b: &dyn InterruptHandler) -> bool {
    core::ptr::eq(
        a as *const dyn InterruptHandler as *const (),
        b as *const dyn InterruptHandler as *const (),
    )
}

/// Global registry used by the platform interrupt vectors
pub static REGISTRY: TimerRegistry = TimerRegistry::new();

/// Forward a compare-match event of `timer` through the global registry
pub fn dispatch(timer: TimerId) {
    REGISTRY.dispatch(timer);
}
