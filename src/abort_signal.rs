use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use parking_lot::Once;
use tracing::{info, warn};

/// A flag polled by the swarm before every generation.
///
/// Once [`is_aborted`](AbortSignal::is_aborted) returns `true`, the run stops with
/// [`SwarmStatus::Aborted`](crate::SwarmStatus::Aborted) and the swarm keeps the best point
/// found so far.
pub trait AbortSignal {
    /// Returns `true` if the run should stop.
    fn is_aborted(&self) -> bool;
    /// Request the run to stop.
    fn abort(&self);
    /// Clear a previous request so the signal can be reused for another run.
    fn reset(&self);
}

/// Sharing a signal through an [`Arc`] lets another thread (a watchdog enforcing a wall-clock
/// budget, for instance) stop a run in progress.
impl<T: AbortSignal + ?Sized> AbortSignal for Arc<T> {
    fn is_aborted(&self) -> bool {
        T::is_aborted(self)
    }

    fn abort(&self) {
        T::abort(self);
    }

    fn reset(&self) {
        T::reset(self);
    }
}

static CTRL_C_HANDLER: Once = Once::new();
static CTRL_C_PRESSED: AtomicBool = AtomicBool::new(false);

/// Stops the swarm when the user presses `Ctrl-C`.
///
/// Every instance reads the same process-wide flag.
/// <div class="warning">Creating the first instance installs a `Ctrl-C` handler for the whole
/// process, which replaces any handler installed by other libraries (e.g. `tokio`).</div>
#[derive(Debug)]
pub struct CtrlCAbortSignal {}

impl Default for CtrlCAbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CtrlCAbortSignal {
    /// Install the process `Ctrl-C` handler (once) and return a signal reading it.
    ///
    /// A handler that cannot be installed is logged as a warning; the signal can then only be
    /// raised through [`AbortSignal::abort`].
    pub fn new() -> Self {
        CTRL_C_HANDLER.call_once(|| {
            let installed = ctrlc::set_handler(|| {
                info!("Ctrl-C pressed, stopping after the current generation");
                CTRL_C_PRESSED.store(true, Ordering::SeqCst);
            });
            if let Err(err) = installed {
                warn!(%err, "could not install the Ctrl-C handler");
            }
        });
        Self {}
    }
}

impl AbortSignal for CtrlCAbortSignal {
    fn is_aborted(&self) -> bool {
        CTRL_C_PRESSED.load(Ordering::SeqCst)
    }

    fn abort(&self) {
        CTRL_C_PRESSED.store(true, Ordering::SeqCst);
    }

    fn reset(&self) {
        CTRL_C_PRESSED.store(false, Ordering::SeqCst);
    }
}

/// A signal that never fires, used by [`Swarm::optimise`](crate::Swarm::optimise).
#[derive(Debug, Default, Clone, Copy)]
pub struct NopAbortSignal;

impl AbortSignal for NopAbortSignal {
    fn is_aborted(&self) -> bool {
        false
    }

    fn abort(&self) {}

    fn reset(&self) {}
}

/// A signal owned by the caller, raised with [`AbortSignal::abort`].
///
/// Wrap it in an [`Arc`] to raise it from another thread.
#[derive(Debug, Default)]
pub struct AtomicAbortSignal {
    raised: AtomicBool,
}

impl AtomicAbortSignal {
    /// Create a signal that has not been raised.
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }
}

impl AbortSignal for AtomicAbortSignal {
    fn is_aborted(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    fn abort(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    fn reset(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }
}
