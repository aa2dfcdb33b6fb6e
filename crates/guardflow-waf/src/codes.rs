//! WAF-regional error code vocabulary
//!
//! Per-call-site allow-lists per the classification policy: throttling is
//! transient for every call, a nonexistent item only for delete-type calls
//! expecting eventual removal.

use guardflow_gate::CoordinatorConfig;

/// The change token was already consumed or a change is still propagating.
pub const STALE_DATA: &str = "WAFStaleDataException";
/// Transient fault inside the service.
pub const INTERNAL_ERROR: &str = "WAFInternalErrorException";
/// The referenced entity does not (or no longer does) exist.
pub const NONEXISTENT_ITEM: &str = "WAFNonexistentItemException";
/// Account-level entity limit reached.
pub const LIMITS_EXCEEDED: &str = "WAFLimitsExceededException";
/// Rate limiting, current and legacy spellings.
pub const THROTTLING: &str = "ThrottlingException";
pub const THROTTLING_LEGACY: &str = "Throttling";
/// Synthetic code for transport-level failures (connection reset, etc.),
/// assigned at the client boundary.
pub const REQUEST_ERROR: &str = "RequestError";
/// Synthetic code for failed responses that carry no service-error envelope
/// (proxy or auth-layer rejections). Terminal: absent from every allow-list.
pub const HTTP_ERROR: &str = "HTTPError";

/// Codes that invalidate the current token and warrant a fresh exchange.
pub fn token_conflict_codes() -> Vec<String> {
    vec![
        STALE_DATA.to_string(),
        INTERNAL_ERROR.to_string(),
        THROTTLING.to_string(),
        THROTTLING_LEGACY.to_string(),
        REQUEST_ERROR.to_string(),
    ]
}

/// Codes retryable while issuing a token.
pub fn token_issue_codes() -> Vec<String> {
    vec![
        THROTTLING.to_string(),
        THROTTLING_LEGACY.to_string(),
        INTERNAL_ERROR.to_string(),
        REQUEST_ERROR.to_string(),
    ]
}

/// Conflict codes for delete-type calls, which additionally tolerate the
/// entity having already disappeared.
pub fn delete_conflict_codes() -> Vec<String> {
    let mut codes = token_conflict_codes();
    codes.push(NONEXISTENT_ITEM.to_string());
    codes
}

/// Coordinator configuration pre-populated with the WAF vocabulary.
pub fn coordinator_config() -> CoordinatorConfig {
    CoordinatorConfig {
        conflict_codes: token_conflict_codes(),
        throttle_codes: token_issue_codes(),
        ..CoordinatorConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardflow_gate::is_retryable;

    #[test]
    fn test_stale_data_is_a_conflict_everywhere() {
        assert!(is_retryable(STALE_DATA, &token_conflict_codes()));
        assert!(is_retryable(STALE_DATA, &delete_conflict_codes()));
    }

    #[test]
    fn test_nonexistent_item_only_retried_on_delete() {
        assert!(!is_retryable(NONEXISTENT_ITEM, &token_conflict_codes()));
        assert!(is_retryable(NONEXISTENT_ITEM, &delete_conflict_codes()));
    }

    #[test]
    fn test_limits_exceeded_is_terminal() {
        assert!(!is_retryable(LIMITS_EXCEEDED, &token_conflict_codes()));
        assert!(!is_retryable(LIMITS_EXCEEDED, &token_issue_codes()));
    }

    #[test]
    fn test_default_config_carries_the_vocabulary() {
        let config = coordinator_config();

        assert!(config.conflict_codes.contains(&STALE_DATA.to_string()));
        assert!(config.throttle_codes.contains(&THROTTLING.to_string()));
        assert_eq!(config.exchange_timeout_ms, 900_000);
    }
}
