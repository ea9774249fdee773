//! Backend test support utilities
//!
//! Shared by unit and integration tests: idempotent logging initialisation,
//! assertions on the JSON error contract, and unique account data.

pub mod error_body;
pub mod logging;
pub mod unique_helpers;
