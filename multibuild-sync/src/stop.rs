//! Graceful stop shared between the Ctrl-C handler and the orchestrator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop request, checked between repositories.
///
/// Clones share the same flag, so a Ctrl-C handler can hold one clone while
/// the orchestrator polls another.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let signal = StopSignal::new();
        let handler_side = signal.clone();
        assert!(!signal.is_requested());
        handler_side.request();
        assert!(signal.is_requested());
    }
}
