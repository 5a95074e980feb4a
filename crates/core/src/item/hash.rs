//! Fingerprint keys for visited items.

use crate::url::url_with_path_only;

/// Compute the 32-bit rolling hash of a string.
///
/// Each UTF-16 code unit is folded in as `hash * 31 + unit` with wrapping
/// arithmetic, so keys match the ones computed by the browser side.
pub fn hash_code(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Compute the identity key of a visited item.
///
/// Query strings, fragments and trailing slashes do not contribute, so
/// `https://a.b/x?page=2` and `https://a.b/x/` share a key when titles match.
pub fn compute_item_key(title: &str, url: &str) -> i32 {
    let mut material = String::with_capacity(title.len() + url.len());
    material.push_str(title);
    material.push_str(url_with_path_only(url));
    hash_code(&material)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_empty() {
        assert_eq!(hash_code(""), 0);
    }

    #[test]
    fn test_hash_known_values() {
        assert_eq!(hash_code("a"), 97);
        assert_eq!(hash_code("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_hash_wraps() {
        // long inputs overflow i32 and must wrap rather than panic
        let long = "x".repeat(4096);
        assert_eq!(hash_code(&long), hash_code(&long));
    }

    #[test]
    fn test_hash_different_strings() {
        assert_ne!(hash_code("a"), hash_code("b"));
    }

    #[test]
    fn test_hash_counts_utf16_units() {
        // U+1F600 is a surrogate pair: two units folded in
        let expected = (0xD83Di32).wrapping_mul(31).wrapping_add(0xDE00);
        assert_eq!(hash_code("\u{1F600}"), expected);
    }

    #[test]
    fn test_key_ignores_query_and_fragment() {
        let plain = compute_item_key("Docs", "https://a.b/xxx");
        assert_eq!(compute_item_key("Docs", "https://a.b/xxx?page=2"), plain);
        assert_eq!(compute_item_key("Docs", "https://a.b/xxx#intro"), plain);
        assert_eq!(compute_item_key("Docs", "https://a.b/xxx/"), plain);
    }

    #[test]
    fn test_key_depends_on_title() {
        assert_ne!(compute_item_key("Old", "https://a.b/xxx"), compute_item_key("New", "https://a.b/xxx"));
    }
}
