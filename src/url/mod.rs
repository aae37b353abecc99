//! URL handling module for Sumi-Index
//!
//! This module provides URL normalization and resolution of link targets found
//! on crawled pages.

mod normalize;

pub use normalize::normalize_url;

use url::Url;

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links (same page anchors)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Arguments
///
/// * `href` - The raw href attribute value
/// * `base_url` - URL of the page the link was found on
///
/// # Examples
///
/// ```
/// use sumi_index::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let resolved = resolve_link("guide#setup", &base).unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/docs/guide");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match normalize::normalize_parsed(absolute) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Dropping link {}: {}", href, e);
            None
        }
    }
}
