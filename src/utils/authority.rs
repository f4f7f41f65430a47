//! RDAP authority extraction.
//!
//! The authority is the lower-cased host of an RDAP endpoint URL. Scheme, port,
//! credentials, path, query and fragment are all discarded.

use url::Url;

use crate::error::AppError;

/// Extracts the RDAP authority from an endpoint URL.
///
/// Leading and trailing whitespace is ignored. The URL must be absolute: a bare
/// host such as `rdapserver.net` has no network-location component and is
/// rejected.
///
/// # Errors
///
/// Returns [`AppError::MalformedUrl`] if the URL cannot be parsed or has no host.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     extract_authority("HTTPS://RDAP.RRPProxy.net/domain/").unwrap(),
///     "rdap.rrpproxy.net"
/// );
/// ```
pub fn extract_authority(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|e| AppError::malformed_url(trimmed, e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_ascii_lowercase()),
        _ => Err(AppError::malformed_url(trimmed, "URL has no host")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_https() {
        assert_eq!(
            extract_authority("https://rdap.rrpproxy.net").unwrap(),
            "rdap.rrpproxy.net"
        );
    }

    #[test]
    fn test_extract_discards_path_and_query() {
        assert_eq!(
            extract_authority("https://rdap.example.com/rdap/domain?x=1#frag").unwrap(),
            "rdap.example.com"
        );
    }

    #[test]
    fn test_extract_lowercases_host() {
        assert_eq!(
            extract_authority("HTTPS://RDAP.Example.COM/").unwrap(),
            "rdap.example.com"
        );
    }

    #[test]
    fn test_extract_discards_port() {
        assert_eq!(
            extract_authority("http://rdap.example.com:8080/").unwrap(),
            "rdap.example.com"
        );
    }

    #[test]
    fn test_extract_trims_whitespace() {
        assert_eq!(
            extract_authority("  https://rdap.example.com/  ").unwrap(),
            "rdap.example.com"
        );
    }

    #[test]
    fn test_bare_host_is_malformed() {
        let result = extract_authority("rdapserver.net");

        assert!(matches!(result, Err(AppError::MalformedUrl { .. })));
    }

    #[test]
    fn test_empty_is_malformed() {
        assert!(matches!(
            extract_authority("   "),
            Err(AppError::MalformedUrl { .. })
        ));
    }

    #[test]
    fn test_hostless_scheme_is_malformed() {
        assert!(matches!(
            extract_authority("mailto:rdap@example.com"),
            Err(AppError::MalformedUrl { .. })
        ));
    }
}
