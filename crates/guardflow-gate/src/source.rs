//! Change-token source capability

use crate::error::ApiError;
use async_trait::async_trait;

/// Capability for obtaining fresh change tokens from the target service.
///
/// Implemented by the concrete API binding; the coordinator never sees the
/// binding's full error type, only the tagged [`ApiError`] it constructs at
/// this boundary.
#[async_trait]
pub trait ChangeTokenSource: Send + Sync {
    /// Issue a brand-new change token. Issuance itself can be throttled, so
    /// callers run this through the retrier with the throttle allow-list.
    async fn issue_change_token(&self) -> Result<String, ApiError>;
}
