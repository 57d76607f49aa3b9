//! API handlers for the gate service.
//!
//! This module organizes the service's route handlers: the gate lifecycle
//! under `gate`, plus plain health and root endpoints.

pub mod gate;
pub mod health;
pub mod root;
