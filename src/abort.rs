//! Cooperative cancellation handle (§5). Consulted at enumeration level boundaries and every
//! 1024 simulator trials; the CLI does not currently wire it to a signal handler, but nothing
//! stops a caller from doing so.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply-clonable, thread-safe abort flag.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    /// A fresh, unset token.
    pub fn new() -> Self {
        AbortToken(Arc::new(AtomicBool::new(false)))
    }

    /// Signals abort. Idempotent.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`AbortToken::abort`] has been called on this token or any of its clones.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset_and_observes_abort_through_a_clone() {
        let token = AbortToken::new();
        let clone = token.clone();
        assert!(!token.is_aborted());
        clone.abort();
        assert!(token.is_aborted());
    }
}
