//! One-time initialization lifecycle for the registry.
//!
//! A registry moves through UNINITIALIZED → INITIALIZING → READY exactly
//! once; a discovery failure lands it in ERROR, where it stays until an
//! explicit reset. Exactly one caller performs the work, callers arriving
//! during INITIALIZING park on a condvar, and callers after the fact
//! observe the outcome immediately.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
    /// Sticky failure; carries the reason every later caller sees.
    Error(String),
}

/// Outcome of claiming initialization.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum InitClaim {
    /// This caller won the race and must run discovery, then report the
    /// outcome through `complete_ok`/`complete_err`.
    Run,
    /// The registry is ready; proceed.
    Ready,
    /// A previous initialization failed and was not reset.
    Failed(String),
}

#[derive(Debug)]
pub(crate) struct Lifecycle {
    state: Mutex<LifecycleState>,
    ready: Condvar,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Lifecycle {
            state: Mutex::new(LifecycleState::Uninitialized),
            ready: Condvar::new(),
        }
    }

    // Registry state stays consistent across a poisoned lock: every
    // transition writes a complete state value, so recover the guard.
    fn lock(&self) -> MutexGuard<'_, LifecycleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims initialization, parking while another caller initializes.
    pub(crate) fn begin(&self) -> InitClaim {
        let mut state = self.lock();
        loop {
            match &*state {
                LifecycleState::Ready => return InitClaim::Ready,
                LifecycleState::Error(reason) => return InitClaim::Failed(reason.clone()),
                LifecycleState::Initializing => {
                    state = self
                        .ready
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                LifecycleState::Uninitialized => {
                    *state = LifecycleState::Initializing;
                    debug!("registry lifecycle: uninitialized -> initializing");
                    return InitClaim::Run;
                }
            }
        }
    }

    /// Marks initialization successful and wakes parked callers.
    pub(crate) fn complete_ok(&self) {
        let mut state = self.lock();
        *state = LifecycleState::Ready;
        debug!("registry lifecycle: initializing -> ready");
        self.ready.notify_all();
    }

    /// Marks initialization failed and wakes parked callers.
    pub(crate) fn complete_err(&self, reason: String) {
        let mut state = self.lock();
        debug!(reason = %reason, "registry lifecycle: initializing -> error");
        *state = LifecycleState::Error(reason);
        self.ready.notify_all();
    }

    /// Drops back to UNINITIALIZED so a later caller can retry discovery.
    pub(crate) fn reset(&self) {
        let mut state = self.lock();
        debug!("registry lifecycle: reset to uninitialized");
        *state = LifecycleState::Uninitialized;
        self.ready.notify_all();
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> LifecycleState {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_caller_runs() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.begin(), InitClaim::Run);
        lifecycle.complete_ok();
        assert_eq!(lifecycle.begin(), InitClaim::Ready);
    }

    #[test]
    fn test_failure_is_sticky_until_reset() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.begin(), InitClaim::Run);
        lifecycle.complete_err("scan failed".to_string());

        assert_eq!(lifecycle.begin(), InitClaim::Failed("scan failed".to_string()));
        assert_eq!(lifecycle.snapshot(), LifecycleState::Error("scan failed".to_string()));

        lifecycle.reset();
        assert_eq!(lifecycle.begin(), InitClaim::Run);
    }

    #[test]
    fn test_waiters_observe_initializer_outcome() {
        let lifecycle = Arc::new(Lifecycle::new());
        assert_eq!(lifecycle.begin(), InitClaim::Run);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let lifecycle = Arc::clone(&lifecycle);
            handles.push(std::thread::spawn(move || lifecycle.begin()));
        }

        // Give the waiters a moment to park on the condvar.
        std::thread::sleep(std::time::Duration::from_millis(20));
        lifecycle.complete_ok();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), InitClaim::Ready);
        }
    }
}
