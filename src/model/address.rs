//! Recipient field normalisation.
//!
//! Recipient fields are typed free-form: entries separated by `,` or `;`,
//! padded with whitespace, sometimes with stray separators. The wire form is
//! the same entries trimmed and comma-joined, with blanks dropped. Entry
//! contents are passed through untouched; the delivery service validates
//! addresses.

/// List separators accepted in a recipient field.
pub const SEPARATORS: [char; 2] = [',', ';'];

/// Split a recipient field into trimmed, non-empty entries, in order.
pub fn split_recipients(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(SEPARATORS)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Normalise a free-form recipient field into the comma-joined wire form.
///
/// `"a@x.com; b@x.com ,, c@x.com"` becomes `"a@x.com,b@x.com,c@x.com"`.
/// Returns an empty string when no entries survive.
pub fn normalize_recipients(raw: &str) -> String {
    split_recipients(raw).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mixed_separators() {
        assert_eq!(
            normalize_recipients("a@x.com; b@x.com ,, c@x.com"),
            "a@x.com,b@x.com,c@x.com"
        );
    }

    #[test]
    fn test_normalize_only_separators_is_empty() {
        assert_eq!(normalize_recipients(" ;, ; "), "");
        assert_eq!(normalize_recipients(""), "");
    }

    #[test]
    fn test_entries_are_trimmed_not_rewritten() {
        assert_eq!(
            normalize_recipients("Alice <alice@example.com>;bob@example.com"),
            "Alice <alice@example.com>,bob@example.com"
        );
        assert_eq!(normalize_recipients("<a@x.com>, b@x.com"), "<a@x.com>,b@x.com");
    }

    #[test]
    fn test_unbalanced_delimiters_do_not_swallow_separators() {
        assert_eq!(normalize_recipients("a@x.com <; b@x.com"), "a@x.com <,b@x.com");
        assert_eq!(normalize_recipients("\"a@x.com, b@x.com"), "\"a@x.com,b@x.com");
        assert_eq!(
            normalize_recipients("Bob <bob@x.com, c@x.com"),
            "Bob <bob@x.com,c@x.com"
        );
    }

    #[test]
    fn test_quoted_separators_still_split() {
        let entries: Vec<_> = split_recipients("\"Last; First\" <a@b.com>; other@c.com").collect();
        assert_eq!(entries, ["\"Last", "First\" <a@b.com>", "other@c.com"]);
    }

    #[test]
    fn test_no_entry_contains_separator_or_padding() {
        for raw in ["x@y.com ;; <z@y.com> ,\"q", "  <  ;  >  ", "\"\"\"; ,<<"] {
            for entry in normalize_recipients(raw).split(',') {
                assert!(!entry.contains(SEPARATORS), "{raw:?} -> {entry:?}");
                assert_eq!(entry, entry.trim(), "{raw:?} -> {entry:?}");
            }
        }
    }
}
