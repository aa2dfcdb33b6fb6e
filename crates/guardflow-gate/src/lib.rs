//! GuardFlow Change Gate
//!
//! This crate provides the call-reliability layer underneath any mutating call
//! against a change-token-gated cloud API. The target service requires every
//! mutating call to carry a freshly issued, single-use change token; the token
//! is invalidated the moment any other caller consumes it or while the service
//! is still propagating a prior change.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │             resource operations                  │
//! │        (create / update / delete calls)          │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               guardflow-gate                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  TokenCoordinator (per-region serialize)  │   │
//! │  └──────────────┬───────────────────────────┘   │
//! │  ┌──────────────▼───────────────────────────┐   │
//! │  │  retry_until (deadline-bounded backoff)   │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │ token source  │  trait ChangeTokenSource
//! │  (API crate)  │
//! └───────────────┘
//! ```
//!
//! Retry decisions are made purely on the string code of a tagged [`ApiError`];
//! each call site supplies its own allow-list of transient codes.

pub mod classify;
pub mod coordinator;
pub mod error;
pub mod registry;
pub mod retry;
pub mod source;

// Re-exports
pub use classify::is_retryable;
pub use coordinator::{CoordinatorConfig, TokenCoordinator};
pub use error::{ApiError, GateError, Result};
pub use registry::RegionRegistry;
pub use retry::{BackoffConfig, retry_until};
pub use source::ChangeTokenSource;
