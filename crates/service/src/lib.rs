//! Service layer for the booking system.
//! - Keeps business rules (validation, slot conflicts, phone normalization) out of the HTTP layer.
//! - Persists appointments in a single JSON document.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod appointments;
