// Background sweep of expired sessions
//
// Passive TTL reclamation only. Session resolution still rejects and deletes
// an expired session on its own, so a disabled or lagging sweeper never lets
// an expired session through.

use finfancy_core::Authenticator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Spawn the sweep loop. It runs until `shutdown_rx` changes.
pub fn spawn_session_sweeper(
    authenticator: Arc<Authenticator>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match authenticator.purge_expired_sessions().await {
                        Ok(0) => debug!("No expired sessions to sweep"),
                        Ok(removed) => info!(removed, "Swept expired sessions"),
                        Err(e) => error!("Session sweep failed: {}", e),
                    }
                }
                _ = shutdown_rx.changed() => {
                    debug!("Session sweeper: shutdown requested");
                    break;
                }
            }
        }

        debug!("Session sweeper exited");
    })
}
