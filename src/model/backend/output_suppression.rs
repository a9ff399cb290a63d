//! Silencing of solver engine chatter
//!
//! Engines such as CBC write their log straight to the process's stdout file
//! descriptor, bypassing Rust's buffered handles. The `gag` crate can redirect
//! that descriptor, but only one gag per stream may exist at a time, so the
//! gag lives in a process-wide slot and is shared through reference counting:
//! concurrent solves on different threads hold handles to the same gag, and the
//! stream is restored once the last handle is dropped.

use gag::Gag;
use std::io;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A shared handle keeping stdout silenced while alive
pub struct GagHandle {
    _gag: Arc<Gag>,
}

impl GagHandle {
    /// Silence stdout until every handle obtained this way is dropped
    pub fn stdout() -> io::Result<Self> {
        STDOUT_SLOT.acquire()
    }
}

/// Process-wide slot holding a weak reference to the live stdout gag
struct GagSlot {
    live: Mutex<Weak<Gag>>,
}

impl GagSlot {
    const fn new() -> Self {
        Self {
            live: Mutex::new(Weak::new()),
        }
    }

    fn acquire(&self) -> io::Result<GagHandle> {
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(gag) = live.upgrade() {
            return Ok(GagHandle { _gag: gag });
        }

        let gag = Arc::new(Gag::stdout()?);
        *live = Arc::downgrade(&gag);
        Ok(GagHandle { _gag: gag })
    }
}

static STDOUT_SLOT: GagSlot = GagSlot::new();

/// Guard held by a backend for the duration of a solve
///
/// When the engine is not verbose the guard silences stdout; failing to do so
/// only costs a noisy terminal, so the failure is logged and solving goes on.
pub struct QuietGuard {
    handle: Option<GagHandle>,
}

impl QuietGuard {
    pub fn acquire(verbose: bool) -> Self {
        if verbose {
            return Self { handle: None };
        }
        match GagHandle::stdout() {
            Ok(handle) => Self {
                handle: Some(handle),
            },
            Err(e) => {
                log::warn!("could not silence solver output: {}", e);
                Self { handle: None }
            }
        }
    }

    pub fn is_silencing(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_stdout_handles_share_one_gag() {
        let first = match GagHandle::stdout() {
            Ok(handle) => handle,
            Err(_) => {
                // Another test of this process holds the stream in a way we cannot share
                return;
            }
        };
        let second = GagHandle::stdout().expect("live gag should be shared");

        assert!(Arc::ptr_eq(&first._gag, &second._gag));
        assert!(Arc::strong_count(&second._gag) >= 2);
    }

    #[test]
    fn test_concurrent_acquire_does_not_panic() {
        const NUM_THREADS: usize = 3;
        let barrier = Arc::new(Barrier::new(NUM_THREADS));

        let workers: Vec<_> = (0..NUM_THREADS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    GagHandle::stdout().is_ok()
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("thread should not panic");
        }
    }

    #[test]
    fn test_verbose_guard_keeps_output() {
        let guard = QuietGuard::acquire(true);
        assert!(!guard.is_silencing());
    }

    #[test]
    fn test_quiet_guard_can_be_reacquired_after_drop() {
        let guard = QuietGuard::acquire(false);
        if !guard.is_silencing() {
            // stdout cannot be redirected in this environment
            return;
        }
        drop(guard);

        let again = QuietGuard::acquire(false);
        assert!(again.is_silencing());
    }
}
