//! Periodic cleanup of expired gate records.
//!
//! Every operation that inspects a record already deletes it when invalid,
//! so the sweep is purely hygienic: it keeps the maps from accumulating
//! sessions nobody will present again and registrations nobody finished.

use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::debug;

use super::handlers::gate::{now_unix_ms, GateState};

/// Spawn the background task that sweeps the store on a fixed cadence.
pub(crate) fn spawn_sweeper(
    state: Arc<GateState>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        // Abandoned registrations are kept for a full session lifetime; a
        // visitor can still ask for a resend long after the code went stale.
        let pending_ttl_ms = state.config().session_ttl_seconds().saturating_mul(1000);

        loop {
            let now = now_unix_ms();
            let (sessions, pending) = state.store().sweep(pending_ttl_ms, now).await;
            if sessions > 0 || pending > 0 {
                debug!(sessions, pending, "swept expired gate records");
            }

            sleep(interval).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::gate::{Enrollee, SessionRecord};
    use uuid::Uuid;

    #[tokio::test]
    async fn sweeper_removes_expired_sessions() {
        let state = crate::api::handlers::gate::test_support::state();
        let now = now_unix_ms();
        state
            .store()
            .insert_session(
                vec![1, 2, 3],
                SessionRecord {
                    session_id: Uuid::new_v4(),
                    user: Enrollee {
                        full_name: "Ada Lovelace".to_string(),
                        email: "ada@example.com".to_string(),
                        organization: "Analytical Engines".to_string(),
                        nda_accepted: true,
                        nda_accepted_at: now,
                    },
                    authenticated: true,
                    login_at: now - 10_000,
                    expires_at: now - 1_000,
                },
            )
            .await;

        let handle = spawn_sweeper(state.clone(), Duration::from_millis(10));
        sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert_eq!(state.store().session_len().await, 0);
    }
}
