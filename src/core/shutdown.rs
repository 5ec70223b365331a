//! Cooperative cancellation shared between the signal listener, the
//! scheduler loop and in-flight check cycles.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Raises the signal. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`Shutdown::trigger`] has been called, immediately if it
    /// already was.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|stop| *stop).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns a task that triggers `shutdown` on SIGINT or SIGTERM.
pub fn listen_for_signals(shutdown: Shutdown) {
    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        tracing::info!(%signal, "Received signal, shutting down gracefully");
        shutdown.trigger();
    });
}

/// Resolves once `ctrl_c` reports an interrupt. If the handler could not be
/// registered the error is logged and this never resolves.
async fn interrupted<F>(ctrl_c: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = ctrl_c.await {
        tracing::warn!(error = %e, "Unable to listen for SIGINT");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let terminated = async {
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                if term.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = interrupted(tokio::signal::ctrl_c()) => "SIGINT",
        _ = terminated => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    interrupted(tokio::signal::ctrl_c()).await;
    "ctrl-c"
}
