// ABOUTME: Site identity resolution from article URLs.
// ABOUTME: Derives the rule-table lookup key from a URL's host component.

//! Site identity resolution.
//!
//! The extraction rule table is keyed by the URL's network host, kept
//! exactly as the URL parser produces it (`www.` prefixes intact, because
//! publishers register the host form their canonical links use).

use url::Url;

/// Derives the rule-table key for a URL: its host component.
///
/// Malformed or host-less URLs yield an empty key, which resolves to the
/// default profile downstream. Never fails.
pub fn site_key(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host.to_string()))
        .unwrap_or_default()
}

/// Prefixes `https://` when the URL does not start with an HTTP scheme.
///
/// Request payloads routinely arrive as bare hosts (`example.com/a`); the
/// rest of the pipeline only works with absolute URLs.
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
