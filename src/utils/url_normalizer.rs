//! URL validation and normalization.
//!
//! Every URL is normalized before hashing and storage so that trivially
//! different spellings of the same target deduplicate to one link.

use url::Url;

/// Validates and normalizes a destination URL.
///
/// # Normalization
///
/// - Scheme must be `http` or `https`
/// - Host is lowercased
/// - Default ports (80/443) are dropped
/// - The fragment is removed
///
/// # Errors
///
/// Returns a human-readable reason when the URL cannot be parsed or uses a
/// disallowed scheme.
pub fn normalize_url(input: &str) -> Result<String, String> {
    let mut url = Url::parse(input.trim()).map_err(|e| format!("Invalid URL: {e}"))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("Only http/https URLs are allowed, got '{other}'")),
    }

    if url.host_str().is_none() {
        return Err("URL must have a host".to_string());
    }

    if let Some(host) = url.host_str() {
        let host_lc = host.to_ascii_lowercase();
        url.set_host(Some(&host_lc))
            .map_err(|_| "Failed to normalize host".to_string())?;
    }

    url.set_fragment(None);

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None)
            .map_err(|_| "Failed to drop default port".to_string())?;
    }

    Ok(url.to_string())
}
