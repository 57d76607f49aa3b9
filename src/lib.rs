//! # Warpgate (Access Gate & Verification Service)
//!
//! `warpgate` is the server-side access gate for the Warpeed static site. A
//! visitor requests access with name/email, receives a one-time code by
//! email, and on a correct entry is granted an opaque session token that
//! protected pages check before rendering content.
//!
//! ## Enrollment
//!
//! - **Request:** `POST /v1/gate/access-request` validates the form, stores a
//!   pending registration keyed by normalized email, and sends a 6-digit code
//!   through the configured email collaborator. At most one pending
//!   registration and one current code exist per address.
//! - **Verify:** `POST /v1/gate/verify-code` checks the code against the
//!   pending slot. Expired codes clear the slot and require a restart;
//!   mismatches keep the slot so the visitor can retry.
//!
//! ## Sessions
//!
//! Session tokens are 256-bit random values; only their SHA-256 hash is kept
//! server-side. A session is valid while it is marked authenticated and
//! unexpired; any record that fails either check is deleted on sight. A
//! periodic sweep removes expired sessions and abandoned registrations.
//!
//! > **Warning:** The optional master-code bypass exists solely for parity
//! > with the legacy client-side gate. It is disabled unless explicitly
//! > configured and should stay off in production.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
