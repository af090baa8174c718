//! Interrupt receiver abstraction

/// Receiver of a timer's compare-match interrupt.
///
/// Platform interrupt entry points look up the registered handler for their
/// timer and call [`on_interrupt`](Self::on_interrupt) once per event.
/// Implementations run in interrupt context: they must not block or allocate.
pub trait InterruptHandler: Sync {
    /// Service one compare-match event
    fn on_interrupt(&self);

    /// Another handler has taken over the timer; no further events arrive
    fn on_evicted(&self) {}
}
