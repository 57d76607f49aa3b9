//! Gate handlers and supporting modules.
//!
//! This module coordinates the enrollment flow (access request, one-time
//! code verification, resend) and session management (gatekeeper check,
//! refresh, logout).
//!
//! ## Lifecycle
//!
//! A pending registration and its current code live in a single slot per
//! normalized email; issuing or resending overwrites the slot. Successful
//! verification consumes the slot and mints a session keyed by the SHA-256
//! hash of an opaque token. Sessions expire absolutely and are refreshed by
//! full reset only.
//!
//! ## Bypass
//!
//! The master-code/designated-address bypass is the legacy client-side
//! gate's documented backdoor. It is retained strictly for feature-parity
//! testing, disabled unless configured, and must stay off in production.

pub(crate) mod config;
mod rate_limit;
pub(crate) mod request;
pub(crate) mod session;
mod state;
mod store;
pub(crate) mod types;
mod utils;
pub(crate) mod verify;

#[cfg(test)]
pub(crate) mod test_support;

pub use rate_limit::{NoopRateLimiter, RateLimitAction, RateLimitDecision, RateLimiter};
pub use state::{GateConfig, GateState};
pub use store::{Enrollee, GateStore, ResendOutcome, SessionRecord, VerifyOutcome};
pub use utils::valid_email;

pub(crate) use utils::now_unix_ms;
