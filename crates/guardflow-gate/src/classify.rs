//! Retryability classification
//!
//! There is deliberately no global table of transient codes: a throttling code
//! is retryable for most calls, while a "nonexistent item" code is retryable
//! only for delete-type operations expecting eventual removal. Each call site
//! supplies its own allow-list.

/// Whether `code` is allow-listed as transient for this call site.
///
/// Pure function of its inputs; exact string match.
pub fn is_retryable<C: AsRef<str>>(code: &str, allow_list: &[C]) -> bool {
    allow_list.iter().any(|candidate| candidate.as_ref() == code)
}
