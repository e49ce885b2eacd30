use crate::url::resolve::{parse_reference, Reference};
use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the hostname from a URL
///
/// Hosts come back lowercase with any port stripped. Relative references and
/// URLs without an authority (`mailto:`, `file:///`) have no hostname.
///
/// # Examples
///
/// ```
/// use sitewalk::url::hostname;
///
/// assert_eq!(hostname("https://Example.TEST:8080/path").unwrap(), "example.test");
/// assert!(hostname("ww.example.test").is_err());
/// ```
pub fn hostname(raw: &str) -> UrlResult<String> {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.to_lowercase()))
        .filter(|host| !host.is_empty())
        .ok_or_else(|| UrlError::InvalidHost(raw.to_string()))
}

/// Returns true if `candidate` belongs to the same host as `base`
///
/// Anything that is not itself absolute is assumed to come from the page at
/// `base` and is accepted as is; its real host is only known after
/// resolution, so callers check again once the reference is absolute (and a
/// malformed reference surfaces there as a resolution failure). Absolute
/// candidates without a host are out of scope.
pub fn is_same_domain(candidate: &str, base: &str) -> bool {
    match parse_reference(candidate) {
        Ok(Reference::Relative) => true,
        Ok(Reference::Absolute(url)) => match (url.host_str(), hostname(base)) {
            (Some(host), Ok(base_host)) => host.eq_ignore_ascii_case(&base_host),
            _ => false,
        },
        Err(_) => true,
    }
}
