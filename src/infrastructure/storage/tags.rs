//! Delimited text encoding for tag lists
//!
//! Used only when the `tags` column is plain text rather than a native
//! array. The format matches PostgreSQL's array literal, `{a,b,c}`, so a
//! column converted with `tags::text` decodes the same way.
//!
//! Tags containing commas or quote characters do not survive a round trip,
//! and leading or trailing whitespace inside a tag is trimmed.

const QUOTES: &[char] = &['"', '\''];

/// Encode tags as `{a,b,c}`
pub fn encode_tags(tags: &[String]) -> String {
    format!("{{{}}}", tags.join(","))
}

/// Decode a delimited tag list
///
/// Blank input decodes to no tags. One enclosing `{}` pair is stripped,
/// elements are split on commas, trimmed of whitespace and quotes, and
/// empty elements are dropped.
pub fn decode_tags(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Vec::new();
    }

    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|element| element.trim().trim_matches(QUOTES).trim())
        .filter(|element| !element.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let original = tags(&["a", "b", "c"]);
        let encoded = encode_tags(&original);

        assert_eq!(encoded, "{a,b,c}");
        assert_eq!(decode_tags(&encoded), original);
    }

    #[test]
    fn test_round_trip_keeps_duplicates_and_inner_spaces() {
        let original = tags(&["rust", "async rust", "rust"]);

        assert_eq!(decode_tags(&encode_tags(&original)), original);
    }

    #[test]
    fn test_empty_tags() {
        assert_eq!(encode_tags(&[]), "{}");
        assert!(decode_tags("{}").is_empty());
        assert!(decode_tags("").is_empty());
        assert!(decode_tags("   \n").is_empty());
    }

    #[test]
    fn test_decode_postgres_array_literal() {
        assert_eq!(
            decode_tags(r#"{rust,"async rust",sql}"#),
            tags(&["rust", "async rust", "sql"])
        );
    }

    #[test]
    fn test_decode_drops_empty_elements() {
        assert_eq!(decode_tags("{a,, ,\"\",b}"), tags(&["a", "b"]));
    }

    #[test]
    fn test_decode_without_braces() {
        assert_eq!(decode_tags(" a , 'b' ,c "), tags(&["a", "b", "c"]));
    }
}
