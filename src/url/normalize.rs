use crate::UrlError;
use url::Url;

/// Normalizes a URL before it is used as a document key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` schemes
/// 3. Require a host (the parser lowercases it)
/// 4. Remove the fragment (everything after #)
/// 5. Reject URLs containing a single quote
///
/// Paths, query strings and trailing slashes are kept as they are, so two URLs
/// that differ only there are distinct documents.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use sumi_index::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.com/page#intro").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Applies the normalization steps to an already parsed URL
pub(crate) fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.as_str().contains('\'') {
        return Err(UrlError::UnsupportedCharacter(url.to_string()));
    }

    Ok(url)
}
