//! Permission set comparison
//!
//! Pure functions, no I/O. `is_subset` is the single input to the session
//! manager's renewal decision: a login request naming a permission outside
//! the credential's granted set forces a fresh interactive authorization.

use std::collections::BTreeSet;

/// Whether every requested permission is already granted.
///
/// An empty request is trivially a subset.
pub fn is_subset(requested: &[String], granted: &BTreeSet<String>) -> bool {
    requested.iter().all(|p| granted.contains(p))
}

/// Split a comma-delimited permission list into names.
///
/// Trims surrounding whitespace and drops empty entries, so
/// `"email, public_profile,"` parses to two names.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_request_is_subset() {
        assert!(is_subset(&[], &granted(&[])));
        assert!(is_subset(&[], &granted(&["email"])));
    }

    #[test]
    fn matching_request_is_subset() {
        assert!(is_subset(&["email".into()], &granted(&["email", "public_profile"])));
    }

    #[test]
    fn extra_requested_permission_is_not_subset() {
        assert!(!is_subset(
            &["email".into(), "user_likes".into()],
            &granted(&["email"])
        ));
    }

    #[test]
    fn anything_against_empty_grants_is_not_subset() {
        assert!(!is_subset(&["email".into()], &granted(&[])));
    }

    #[test]
    fn parse_list_splits_and_trims() {
        assert_eq!(
            parse_list("email, public_profile"),
            vec!["email".to_string(), "public_profile".to_string()]
        );
    }

    #[test]
    fn parse_list_drops_empty_entries() {
        assert_eq!(parse_list(""), Vec::<String>::new());
        assert_eq!(parse_list("email,,"), vec!["email".to_string()]);
    }
}
