use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::utils::verbose_println;

/// Shared "please shut down" flag raised by a termination signal.
///
/// The listener thread only flips the flag and wakes the UI; the UI loop runs
/// the regular shutdown path when it sees the flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }

    pub fn trigger(&self) {
        self.requested.store(true, Ordering::Relaxed);
    }

    /// Spawn a thread that waits for Ctrl-C (and SIGTERM on Unix), then
    /// raises the flag and calls `wake`. The handlers are installed before
    /// this returns.
    pub fn listen<F>(&self, verbose: bool, wake: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut builder = tokio::runtime::Builder::new_current_thread();
        // Unix signals are delivered through the io driver
        #[cfg(unix)]
        builder.enable_io();
        let runtime = builder.build().context("Failed to build signal runtime")?;

        let mut termination = {
            let _guard = runtime.enter();
            Termination::install()?
        };
        let signal = self.clone();

        std::thread::Builder::new()
            .name("gframe-signals".to_string())
            .spawn(move || {
                runtime.block_on(async {
                    match termination.wait().await {
                        Ok(()) => {
                            verbose_println(verbose, "shutdown signal received");
                            signal.trigger();
                            wake();
                        }
                        Err(e) => {
                            verbose_println(verbose, &format!("signal listener failed: {:#}", e));
                        }
                    }
                });
            })
            .context("Failed to spawn signal listener")?;

        Ok(())
    }
}

#[cfg(unix)]
struct Termination {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Termination {
    fn install() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())
                .context("Failed to install SIGINT handler")?,
            terminate: signal(SignalKind::terminate())
                .context("Failed to install SIGTERM handler")?,
        })
    }

    async fn wait(&mut self) -> Result<()> {
        let received = tokio::select! {
            received = self.interrupt.recv() => received,
            received = self.terminate.recv() => received,
        };
        received.context("Signal stream closed")
    }
}

#[cfg(not(unix))]
struct Termination;

#[cfg(not(unix))]
impl Termination {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn wait(&mut self) -> Result<()> {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")
    }
}
