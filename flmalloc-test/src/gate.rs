//! A spinning start gate.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Gate.
///
/// Holds threads until every participant has arrived, then releases them all at once, maximizing the overlap of
/// whatever they do next. One-shot: once open, the gate stays open.
///
/// Arrivals spin rather than park, so release is immediate; keep the participant count at or below the number of
/// cores.
#[derive(Clone, Debug)]
pub struct Gate {
    remaining: Arc<AtomicUsize>,
}

impl Gate {
    /// Creates a gate for `participants` threads.
    pub fn new(participants: usize) -> Self {
        Self { remaining: Arc::new(AtomicUsize::new(participants)) }
    }

    /// Signals arrival, then spins until every participant has arrived.
    pub fn arrive_and_wait(&self) {
        self.remaining.fetch_sub(1, Ordering::AcqRel);

        while self.remaining.load(Ordering::Acquire) > 0 {
            std::hint::spin_loop();
        }
    }
}

// mod tests
