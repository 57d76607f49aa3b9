//! In-memory store for pending registrations and sessions.
//!
//! The gate holds all state in two maps behind async mutexes: pending
//! registrations keyed by normalized email, and sessions keyed by the
//! SHA-256 hash of the opaque token handed to the client. There is one
//! logical writer per record, so the browser-storage races of the legacy
//! client-side gate cannot occur here.
//!
//! Expiry is enforced lazily by every call that inspects a record and
//! swept periodically in the background; both paths delete the same way,
//! so cleanup is idempotent.

use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Registration data carried through the enrollment flow and embedded, by
/// value, in the session it produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enrollee {
    pub full_name: String,
    pub email: String,
    pub organization: String,
    pub nda_accepted: bool,
    pub nda_accepted_at: i64,
}

/// One pending registration with its current one-time code.
/// Reissuing a code overwrites `code` and `issued_at` in place.
#[derive(Clone, Debug)]
struct PendingEntry {
    enrollee: Enrollee,
    code: String,
    issued_at: i64,
}

/// A granted session. Valid iff `authenticated` and `now < expires_at`.
#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub user: Enrollee,
    pub authenticated: bool,
    pub login_at: i64,
    pub expires_at: i64,
}

impl SessionRecord {
    fn is_valid(&self, now: i64) -> bool {
        self.authenticated && now < self.expires_at
    }
}

/// Outcome of checking an entered code against the pending slot.
#[derive(Debug)]
pub enum VerifyOutcome {
    /// Code matched within its lifetime; the pending slot was consumed.
    Granted(Enrollee),
    /// Code was older than its lifetime; the pending slot was cleared.
    Expired,
    /// Wrong code; the pending slot is retained so the caller can retry.
    Mismatch,
    /// No pending registration for this address.
    NoPending,
}

/// Outcome of a resend request.
#[derive(Debug)]
pub enum ResendOutcome {
    /// A fresh code was stored and should now be delivered.
    Reissued(Enrollee),
    /// The current code is younger than the cooldown; nothing was changed.
    Cooldown,
    /// No pending registration for this address.
    NoPending,
}

pub struct GateStore {
    pending: Mutex<HashMap<String, PendingEntry>>,
    sessions: Mutex<HashMap<Vec<u8>, SessionRecord>>,
}

impl GateStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Store (or overwrite) the pending registration for an address together
    /// with its freshly issued code.
    pub async fn put_pending(&self, enrollee: Enrollee, code: String, now: i64) {
        let mut pending = self.pending.lock().await;
        pending.insert(
            enrollee.email.clone(),
            PendingEntry {
                enrollee,
                code,
                issued_at: now,
            },
        );
    }

    /// Check an entered code against the pending slot for `email`.
    ///
    /// The expiry check runs before the comparison: a correct but stale code
    /// still clears the slot and forces a restart, no matter how many
    /// mismatches came before it.
    pub async fn verify_code(
        &self,
        email: &str,
        entered_code: &str,
        code_ttl_ms: i64,
        now: i64,
    ) -> VerifyOutcome {
        let mut pending = self.pending.lock().await;

        let (expired, matched) = match pending.get(email) {
            Some(entry) => (
                now - entry.issued_at > code_ttl_ms,
                entry.code == entered_code,
            ),
            None => return VerifyOutcome::NoPending,
        };

        if expired {
            pending.remove(email);
            return VerifyOutcome::Expired;
        }

        if !matched {
            return VerifyOutcome::Mismatch;
        }

        match pending.remove(email) {
            Some(entry) => VerifyOutcome::Granted(entry.enrollee),
            None => VerifyOutcome::NoPending,
        }
    }

    /// Overwrite the pending slot's code with a fresh one, unless the current
    /// code is still inside the resend cooldown.
    pub async fn reissue_code(
        &self,
        email: &str,
        code: String,
        cooldown_ms: i64,
        now: i64,
    ) -> ResendOutcome {
        let mut pending = self.pending.lock().await;

        let Some(entry) = pending.get_mut(email) else {
            return ResendOutcome::NoPending;
        };

        if now - entry.issued_at < cooldown_ms {
            return ResendOutcome::Cooldown;
        }

        entry.code = code;
        entry.issued_at = now;
        ResendOutcome::Reissued(entry.enrollee.clone())
    }

    pub async fn insert_session(&self, token_hash: Vec<u8>, record: SessionRecord) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token_hash, record);
    }

    /// Look up a session by token hash. Invalid records (expired or not
    /// authenticated) are deleted as a side effect and reported as absent.
    pub async fn lookup_session(&self, token_hash: &[u8], now: i64) -> Option<SessionRecord> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(token_hash).cloned() {
            Some(record) if record.is_valid(now) => Some(record),
            Some(_) => {
                sessions.remove(token_hash);
                None
            }
            None => None,
        }
    }

    /// Reset a valid session's expiry to a full lifetime from `now`.
    /// Returns the refreshed record, or `None` if there is no valid session.
    pub async fn refresh_session(
        &self,
        token_hash: &[u8],
        session_ttl_ms: i64,
        now: i64,
    ) -> Option<SessionRecord> {
        let mut sessions = self.sessions.lock().await;
        let mut record = sessions.remove(token_hash)?;
        if !record.is_valid(now) {
            return None;
        }
        record.expires_at = now + session_ttl_ms;
        sessions.insert(token_hash.to_vec(), record.clone());
        Some(record)
    }

    pub async fn delete_session(&self, token_hash: &[u8]) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(token_hash);
    }

    /// Drop expired sessions and abandoned pending registrations.
    /// Returns `(sessions_removed, pending_removed)` for logging.
    pub async fn sweep(&self, pending_ttl_ms: i64, now: i64) -> (usize, usize) {
        let removed_sessions = {
            let mut sessions = self.sessions.lock().await;
            let before = sessions.len();
            sessions.retain(|_, record| record.is_valid(now));
            before - sessions.len()
        };

        let removed_pending = {
            let mut pending = self.pending.lock().await;
            let before = pending.len();
            pending.retain(|_, entry| now - entry.issued_at <= pending_ttl_ms);
            before - pending.len()
        };

        (removed_sessions, removed_pending)
    }

    #[cfg(test)]
    pub(crate) async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn session_len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

impl Default for GateStore {
    fn default() -> Self {
        Self::new()
    }
}
