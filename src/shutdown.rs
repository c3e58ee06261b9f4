//! Cooperative shutdown.
//!
//! SIGINT and SIGTERM are caught on a dedicated thread running a
//! single-threaded tokio runtime.  The only thing that thread does is set
//! a [`ShutdownToken`]; the polling loop checks the token between sleep
//! slices and performs the flush itself, on its own thread.
//!
//! The listener keeps running after the first signal.  A second signal
//! means the flush is stuck or the operator is impatient, so the process
//! exits immediately with status 130 and any open interval is not logged.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use log::{error, warn};
use tokio::signal::unix::{SignalKind, signal};

/// Shared stop flag.  Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    flag: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Exit status used when a second signal forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

/// What to do on the `count`th signal received (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// Ask the polling loop to stop and flush.
    Stop,
    /// Exit without waiting for the flush.
    Abort,
}

pub fn signal_action(count: u32) -> SignalAction {
    if count <= 1 {
        SignalAction::Stop
    } else {
        SignalAction::Abort
    }
}

/// Install SIGINT/SIGTERM handlers that trigger `token`.
///
/// Handlers are registered before this returns, so a signal arriving right
/// after startup is not lost.  The first signal triggers `token`; a second
/// one exits the process with [`FORCED_EXIT_CODE`].
pub fn install_signal_handlers(token: ShutdownToken) -> std::io::Result<JoinHandle<()>> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let (mut sigint, mut sigterm) = {
        let _ctx = rt.enter();
        (
            signal(SignalKind::interrupt())?,
            signal(SignalKind::terminate())?,
        )
    };

    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            let mut count = 0u32;
            loop {
                let name = rt.block_on(async {
                    tokio::select! {
                        _ = sigint.recv() => "SIGINT",
                        _ = sigterm.recv() => "SIGTERM",
                    }
                });
                count = count.saturating_add(1);
                match signal_action(count) {
                    SignalAction::Stop => {
                        warn!("{} received, shutting down (send again to force)", name);
                        token.trigger();
                    }
                    SignalAction::Abort => {
                        error!("{} received again, exiting without flush", name);
                        std::process::exit(FORCED_EXIT_CODE);
                    }
                }
            }
        })
}
