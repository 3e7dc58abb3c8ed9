//! Slug resolver
//!
//! Exact, case-sensitive lookup of a percent-decoded fragment against a
//! merged snapshot. When several records share a slug (possible because
//! uniqueness is only checked locally at creation), the first one in the
//! snapshot's newest-first order wins.

use std::borrow::Cow;

use tracing::trace;

use crate::errors::{Result, SluglinkerError};
use crate::storage::LinkRecord;

/// Percent-decode a raw fragment.
///
/// Fails on a `%` not followed by two hex digits, and when the decoded
/// bytes are not UTF-8.
pub fn decode_fragment(fragment: &str) -> Result<Cow<'_, str>> {
    // urlencoding 会把非法转义原样保留，需先行校验
    if let Some(pos) = find_bad_escape(fragment) {
        return Err(SluglinkerError::malformed_fragment(format!(
            "Fragment '{}' has an invalid percent escape at byte {}",
            fragment, pos
        )));
    }

    urlencoding::decode(fragment).map_err(|e| {
        SluglinkerError::malformed_fragment(format!(
            "Fragment '{}' is not valid percent-encoded UTF-8: {}",
            fragment, e
        ))
    })
}

/// Byte offset of the first `%` that does not start a `%XX` escape.
fn find_bad_escape(fragment: &str) -> Option<usize> {
    let bytes = fragment.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        let valid = b != b'%'
            || matches!(
                bytes.get(i + 1..i + 3),
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            );
        (!valid).then_some(i)
    })
}

/// Find the record whose slug equals the decoded `fragment`.
///
/// `Ok(None)` is a plain miss. An empty fragment is never resolved; callers
/// treat it as "no redirect requested" before getting here.
pub fn resolve<'a>(fragment: &str, snapshot: &'a [LinkRecord]) -> Result<Option<&'a LinkRecord>> {
    let slug = decode_fragment(fragment)?;
    if slug.is_empty() {
        return Ok(None);
    }

    let found = snapshot.iter().find(|r| r.slug == *slug);
    trace!(
        "resolve '{}' -> {}",
        slug,
        found.map(|r| r.id.as_str()).unwrap_or("<miss>")
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, slug: &str, url: &str) -> LinkRecord {
        LinkRecord::new(id, slug, url)
    }

    #[test]
    fn test_exact_match() {
        let snapshot = vec![rec("1", "abc", "https://x.com")];
        let found = resolve("abc", &snapshot).unwrap().unwrap();
        assert_eq!(found.id, "1");
    }

    #[test]
    fn test_case_sensitive() {
        let snapshot = vec![rec("1", "abc", "https://x.com")];
        assert!(resolve("ABC", &snapshot).unwrap().is_none());
    }

    #[test]
    fn test_percent_decoded_before_lookup() {
        let snapshot = vec![
            rec("1", "hello world", "https://x.com"),
            rec("2", "café", "https://y.com"),
        ];
        assert_eq!(resolve("hello%20world", &snapshot).unwrap().unwrap().id, "1");
        assert_eq!(resolve("caf%C3%A9", &snapshot).unwrap().unwrap().id, "2");
    }

    #[test]
    fn test_first_match_wins_on_duplicate_slug() {
        let snapshot = vec![
            rec("newer", "dup", "https://new.example"),
            rec("older", "dup", "https://old.example"),
        ];
        let found = resolve("dup", &snapshot).unwrap().unwrap();
        assert_eq!(found.id, "newer");
        // stable across calls
        assert_eq!(resolve("dup", &snapshot).unwrap().unwrap().id, "newer");
    }

    #[test]
    fn test_miss() {
        let snapshot = vec![rec("1", "abc", "https://x.com")];
        assert!(resolve("zzz", &snapshot).unwrap().is_none());
    }

    #[test]
    fn test_empty_fragment_is_not_resolved() {
        let snapshot = vec![rec("1", "", "https://x.com")];
        assert!(resolve("", &snapshot).unwrap().is_none());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let snapshot = vec![rec("1", "abc", "https://x.com")];
        let err = resolve("%FF%FE", &snapshot).unwrap_err();
        assert!(matches!(err, SluglinkerError::MalformedFragment(_)));
    }

    #[test]
    fn test_bad_escapes_are_malformed() {
        let snapshot = vec![
            rec("1", "100%", "https://x.com"),
            rec("2", "%zz", "https://y.com"),
            rec("3", "ab%A", "https://z.com"),
        ];
        for fragment in ["100%", "%zz", "ab%A", "%", "%%41"] {
            let err = resolve(fragment, &snapshot).unwrap_err();
            assert!(
                matches!(err, SluglinkerError::MalformedFragment(_)),
                "{} should be malformed",
                fragment
            );
        }
    }

    #[test]
    fn test_escaped_percent_resolves() {
        let snapshot = vec![rec("1", "100%", "https://x.com")];
        assert_eq!(resolve("100%25", &snapshot).unwrap().unwrap().id, "1");
    }

    #[test]
    fn test_find_bad_escape() {
        assert_eq!(find_bad_escape("abc"), None);
        assert_eq!(find_bad_escape("a%20b%C3%A9"), None);
        assert_eq!(find_bad_escape("100%"), Some(3));
        assert_eq!(find_bad_escape("a%2"), Some(1));
        assert_eq!(find_bad_escape("%g0"), Some(0));
    }
}
