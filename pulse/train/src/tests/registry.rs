use core::sync::atomic::{AtomicUsize, Ordering};

use pulse_hal::InterruptHandler;

use crate::binding::TimerId;
use crate::registry::TimerRegistry;

struct Counter {
    hits: AtomicUsize,
    evictions: AtomicUsize,
}

impl Counter {
    const fn new() -> Self {
        Self {
            hits: AtomicUsize::new(0),
            evictions: AtomicUsize::new(0),
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    fn evictions(&self) -> usize {
        self.evictions.load(Ordering::Relaxed)
    }
}

impl InterruptHandler for Counter {
    fn on_interrupt(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn on_evicted(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn dispatch_without_owner_is_ignored() {
    let registry = TimerRegistry::new();
    for timer in TimerId::ALL {
        assert!(registry.owner(timer).is_none());
        registry.dispatch(timer);
    }
}

#[test]
fn dispatch_reaches_owner_of_that_timer_only() {
    static FIRST: Counter = Counter::new();
    static SECOND: Counter = Counter::new();
    let registry = TimerRegistry::new();

    assert!(registry.register(TimerId::Timer1, &FIRST).is_none());
    assert!(registry.register(TimerId::Timer2, &SECOND).is_none());

    registry.dispatch(TimerId::Timer1);
    registry.dispatch(TimerId::Timer1);
    registry.dispatch(TimerId::Timer2);
    registry.dispatch(TimerId::Timer3);

    assert_eq!(FIRST.hits(), 2);
    assert_eq!(SECOND.hits(), 1);
}

#[test]
fn last_registration_wins() {
    static OLD: Counter = Counter::new();
    static NEW: Counter = Counter::new();
    let registry = TimerRegistry::new();

    registry.register(TimerId::Timer4, &OLD);
    let evicted = registry.register(TimerId::Timer4, &NEW);

    assert!(evicted.is_some_and(|handler| core::ptr::eq(
        handler as *const dyn InterruptHandler as *const (),
        &OLD as *const Counter as *const ()
    )));
    assert!(registry.is_owner(TimerId::Timer4, &NEW));
    assert!(!registry.is_owner(TimerId::Timer4, &OLD));

    registry.dispatch(TimerId::Timer4);
    assert_eq!(OLD.hits(), 0);
    assert_eq!(NEW.hits(), 1);
    assert_eq!(OLD.evictions(), 1);
    assert_eq!(NEW.evictions(), 0);
}

#[test]
fn reregistering_owner_does_not_evict() {
    static OWNER: Counter = Counter::new();
    let registry = TimerRegistry::new();

    registry.register(TimerId::Timer2, &OWNER);
    registry.register(TimerId::Timer2, &OWNER);

    assert_eq!(OWNER.evictions(), 0);
    assert!(registry.is_owner(TimerId::Timer2, &OWNER));
}

#[test]
fn timer_indices_are_dense() {
    for (i, timer) in TimerId::ALL.iter().enumerate() {
        assert_eq!(timer.index(), i);
    }
    assert_eq!(TimerId::Timer5.to_string(), "TIMER5");
}
