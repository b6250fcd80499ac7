//! Best-effort usage ping
//!
//! Fires a single fire-and-forget GET per process so the provider can
//! count active integrations. Allowed to fail silently by contract:
//! this is the one place in the workspace where an error is swallowed,
//! and it must never affect the session lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

static PING_SENT: AtomicBool = AtomicBool::new(false);

/// Spawn the usage ping if it has not been sent yet this process.
///
/// Returns `None` when a previous call already claimed the ping. The
/// returned handle is only useful to tests; callers normally drop it.
pub fn spawn_usage_ping(
    client: reqwest::Client,
    url: String,
) -> Option<tokio::task::JoinHandle<()>> {
    if PING_SENT.swap(true, Ordering::SeqCst) {
        return None;
    }
    Some(tokio::spawn(async move {
        match client.get(&url).send().await {
            Ok(response) => debug!(status = %response.status(), "usage ping sent"),
            Err(e) => debug!(error = %e, "usage ping failed (ignored)"),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ping_fires_at_most_once_per_process() {
        let client = reqwest::Client::new();
        // An unroutable address: the ping still counts as sent, and the
        // failure is swallowed.
        let url = "http://127.0.0.1:9/ping".to_string();

        let first = spawn_usage_ping(client.clone(), url.clone());
        let second = spawn_usage_ping(client, url);

        // One of the two claimed the ping; repeats are suppressed.
        assert!(first.is_some());
        assert!(second.is_none());
        first.unwrap().await.unwrap();
    }
}
