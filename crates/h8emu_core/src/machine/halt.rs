use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cross-thread run control for a [`Machine`](super::Machine).
///
/// A halt takes effect at the next instruction boundary inside
/// `Machine::run`; it never interrupts an instruction.
#[derive(Clone, Debug, Default)]
pub struct HaltHandle {
    halted: Arc<AtomicBool>,
}

impl HaltHandle {
    pub fn halt(&self) {
        self.halted.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.halted.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }
}
