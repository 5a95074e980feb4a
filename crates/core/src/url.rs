//! URL helpers for keys and domain matching.
//!
//! None of these functions fail: a URL that cannot be parsed has an empty
//! domain, which never matches a domain-scoped query.

use std::net::IpAddr;

/// Schemes of pages that belong to the browser itself rather than a site.
pub const INTERNAL_SCHEMES: &[&str] = &[
    "chrome",
    "chrome-extension",
    "chrome-search",
    "about",
    "edge",
    "brave",
    "devtools",
];

/// Hostname of `url`, or an empty string when it cannot be parsed.
pub fn domain_of(url: &str) -> String {
    ::url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .unwrap_or_default()
}

/// Strip query string, fragment and trailing slashes from a URL.
///
/// A slash that directly precedes the `?` or `#` is dropped along with it.
pub fn url_with_path_only(url: &str) -> &str {
    let mut end = url.find(['?', '#']).unwrap_or(url.len());
    if end < url.len() && url[..end].ends_with('/') {
        end -= 1;
    }
    url[..end].trim_end_matches('/')
}

/// Whether `url` points at a browser-internal page (settings, new tab, ...).
pub fn is_browser_internal(url: &str) -> bool {
    match ::url::Url::parse(url) {
        Ok(parsed) => INTERNAL_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}

/// Domain to scope a query to for the page open in the current tab.
///
/// Browser-internal pages and unparsable URLs scope to nothing (empty string).
pub fn domain_for_tab(url: &str) -> String {
    if is_browser_internal(url) { String::new() } else { domain_of(url) }
}

/// Lowercase a host and drop surrounding whitespace and the trailing root dot.
pub fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_lowercase()
}

/// Registrable root (eTLD+1) of a host, e.g. `example.co.uk` for `a.example.co.uk`.
///
/// IP addresses, single-label hosts and hosts that are themselves a public
/// suffix are returned unchanged.
pub fn registrable_domain(host: &str) -> String {
    let host = normalize_host(host);
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if bare.parse::<IpAddr>().is_ok() || !host.contains('.') {
        return host;
    }
    match psl::domain_str(&host) {
        Some(root) => root.to_string(),
        None => host,
    }
}

/// Whether `domain` is `root` itself or one of its subdomains.
pub fn is_within(domain: &str, root: &str) -> bool {
    if root.is_empty() {
        return false;
    }
    domain == root || domain.strip_suffix(root).is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://domain.com/xxx"), "domain.com");
    }

    #[test]
    fn test_domain_of_lowercases() {
        assert_eq!(domain_of("https://EXAMPLE.com/"), "example.com");
    }

    #[test]
    fn test_domain_of_invalid() {
        assert_eq!(domain_of("invalid_domain/xxx"), "");
        assert_eq!(domain_of(""), "");
    }

    #[test]
    fn test_path_only_query_string() {
        assert_eq!(url_with_path_only("https://a.b/xxx?xxx"), "https://a.b/xxx");
    }

    #[test]
    fn test_path_only_hash() {
        assert_eq!(url_with_path_only("https://a.b/xxx#xxx"), "https://a.b/xxx");
    }

    #[test]
    fn test_path_only_trailing_slash() {
        assert_eq!(url_with_path_only("https://a.b/xxx/"), "https://a.b/xxx");
        assert_eq!(url_with_path_only("https://a.b/xxx//"), "https://a.b/xxx");
    }

    #[test]
    fn test_path_only_slash_before_query() {
        assert_eq!(url_with_path_only("https://a.b/xxx/?q=1"), "https://a.b/xxx");
        assert_eq!(url_with_path_only("https://a.b/?q=1"), "https://a.b");
    }

    #[test]
    fn test_path_only_first_delimiter_wins() {
        assert_eq!(url_with_path_only("https://a.b/x#frag?not-a-query"), "https://a.b/x");
    }

    #[test]
    fn test_browser_internal() {
        assert!(is_browser_internal("chrome://settings/"));
        assert!(is_browser_internal("chrome-extension://abcdef/popup.html"));
        assert!(is_browser_internal("about:blank"));
        assert!(!is_browser_internal("https://example.com/"));
        assert!(!is_browser_internal("not a url"));
    }

    #[test]
    fn test_domain_for_tab() {
        assert_eq!(domain_for_tab("chrome://newtab/"), "");
        assert_eq!(domain_for_tab("https://docs.rs/tokio"), "docs.rs");
    }

    #[test]
    fn test_registrable_domain() {
        assert_eq!(registrable_domain("a.example.com"), "example.com");
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("deep.a.example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("WWW.Example.COM."), "example.com");
    }

    #[test]
    fn test_registrable_domain_passthrough() {
        assert_eq!(registrable_domain("localhost"), "localhost");
        assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
        assert_eq!(registrable_domain("[::1]"), "[::1]");
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("example.com", "example.com"));
        assert!(is_within("a.example.com", "example.com"));
        assert!(is_within("x.y.example.com", "example.com"));
        assert!(!is_within("badexample.com", "example.com"));
        assert!(!is_within("example.com.evil", "example.com"));
        assert!(!is_within("", "example.com"));
        assert!(!is_within("example.com", ""));
    }
}
