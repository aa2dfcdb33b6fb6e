//! WAF-regional binding for GuardFlow
//!
//! Concrete collaborator for the change gate: the service's error-code
//! vocabulary with per-call-site allow-lists, the tagged-error construction at
//! the API boundary, and a JSON-protocol HTTP client implementing the
//! change-token capability.

pub mod client;
pub mod codes;
pub mod error;

// Re-exports
pub use client::WafRegionalClient;
pub use error::{Result, WafError};
