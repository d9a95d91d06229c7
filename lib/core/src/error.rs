//! Shared error plumbing.
//!
//! Crates in this workspace keep their own error enums (`FetchError`,
//! `ApiError`, ...) and return them wrapped in a rootcause [`Report`] when the
//! failure crosses a crate boundary, so the caller can attach its own context
//! with `.context()` instead of flattening everything into strings.

use rootcause::Report;

/// Workspace-wide result alias over rootcause's [`Report`].
///
/// `C` is the context type carried by the report; most call sites name their
/// domain error enum here, e.g. `Result<Page<T>, ApiError>`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct LookupFailed;

    impl fmt::Display for LookupFailed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "lookup failed")
        }
    }

    impl std::error::Error for LookupFailed {}

    fn lookup(found: bool) -> Result<&'static str, LookupFailed> {
        if found {
            Ok("warehouse")
        } else {
            Err(LookupFailed.into())
        }
    }

    #[test]
    fn domain_error_converts_into_report() {
        assert_eq!(lookup(true).expect("should be ok"), "warehouse");

        assert!(lookup(false).is_err());
    }
}
