//! Signal handling and coordinated drain.
//!
//! The daemon owns one [`Shutdown`]; each listener takes a subscription
//! and hooks it into its graceful-shutdown path. When a signal arrives
//! the daemon calls [`Shutdown::begin`] and gives the listeners a
//! bounded grace period to drain before aborting them.

use std::io;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Broadcasts the shutdown decision to every listener.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// A subscription that resolves once shutdown begins. Subscribing
    /// after `begin` resolves immediately.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener(self.tx.subscribe())
    }

    pub fn begin(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One listener's view of the shutdown decision.
pub struct ShutdownListener(watch::Receiver<bool>);

impl ShutdownListener {
    /// Resolves once shutdown begins.
    pub async fn wait(mut self) {
        let _ = self.0.wait_for(|begun| *begun).await;
    }
}

/// Wait for SIGINT or SIGTERM. Handler installation errors surface
/// before the wait begins.
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
        Ok(())
    }
    #[cfg(not(unix))]
    {
        signal::ctrl_c().await
    }
}

/// Give the listener tasks up to `grace` to finish, then abort them.
pub async fn drain(handles: Vec<JoinHandle<io::Result<()>>>, grace: Duration) {
    let aborts: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();
    match tokio::time::timeout(grace, join_all(handles)).await {
        Ok(results) => {
            for result in results {
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!(error = %e, "listener exited with error"),
                    Err(e) => warn!(error = %e, "listener task failed"),
                }
            }
            info!("all listeners drained");
        }
        Err(_) => {
            warn!(grace_secs = grace.as_secs(), "grace period elapsed; aborting listeners");
            for abort in aborts {
                abort.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_resolve_on_begin() {
        let shutdown = Shutdown::new();
        let first = shutdown.subscribe();
        let second = shutdown.subscribe();
        shutdown.begin();

        tokio::time::timeout(Duration::from_secs(1), async {
            first.wait().await;
            second.wait().await;
        })
        .await
        .unwrap();

        // late subscription resolves immediately
        tokio::time::timeout(Duration::from_secs(1), shutdown.subscribe().wait())
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn drain_returns_once_tasks_finish() {
        let quick: JoinHandle<io::Result<()>> = tokio::spawn(async { Ok(()) });
        drain(vec![quick], Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn drain_aborts_after_grace() {
        let stuck: JoinHandle<io::Result<()>> = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        });
        // must return at the grace deadline, hours before the task would
        tokio::time::timeout(
            Duration::from_secs(10),
            drain(vec![stuck], Duration::from_millis(50)),
        )
        .await
        .expect("drain should return at the grace deadline");
    }
}
