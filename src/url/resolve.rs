use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// A raw `href` value after a first syntactic look
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Reference {
    /// Carries its own scheme
    Absolute(Url),
    /// Needs a base URL before it means anything
    Relative,
}

/// Classifies a raw reference as absolute or relative
///
/// A relative reference is rejected when its first path segment contains a
/// colon (`:xyz`, `1http://x`): such input is neither a valid scheme nor a
/// path and would otherwise be silently joined onto the base.
pub(crate) fn parse_reference(candidate: &str) -> UrlResult<Reference> {
    match Url::parse(candidate) {
        Ok(url) => Ok(Reference::Absolute(url)),
        Err(ParseError::RelativeUrlWithoutBase) => {
            check_relative(candidate)?;
            Ok(Reference::Relative)
        }
        Err(e) => Err(UrlError::Malformed(format!("{}: {}", candidate, e))),
    }
}

fn check_relative(candidate: &str) -> UrlResult<()> {
    if candidate.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlError::Malformed(format!(
            "{}: contains control characters",
            candidate.escape_debug()
        )));
    }

    let first_segment = candidate
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    if first_segment.contains(':') {
        return Err(UrlError::Malformed(format!(
            "{}: missing protocol scheme",
            candidate
        )));
    }

    Ok(())
}

/// Returns true only for `http` and `https` URLs
///
/// Relative references and malformed input are not HTTP URLs.
///
/// # Examples
///
/// ```
/// use sitewalk::url::is_http_scheme;
///
/// assert!(is_http_scheme("https://example.test/"));
/// assert!(!is_http_scheme("mailto:me@example.test"));
/// assert!(!is_http_scheme("webpage1.html"));
/// ```
pub fn is_http_scheme(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Resolves `candidate` to an absolute URL
///
/// An absolute candidate comes back as is (in its canonical serialisation);
/// a relative one is resolved against `base` with standard reference
/// resolution. Malformed references and unusable bases fail with
/// [`UrlError::Resolution`].
///
/// # Arguments
///
/// * `candidate` - The raw reference, typically an `href` value
/// * `base` - The URL of the page the reference was found on
pub fn resolve(candidate: &str, base: &str) -> UrlResult<String> {
    let failed = |reason: String| UrlError::Resolution {
        reference: candidate.to_string(),
        base: base.to_string(),
        reason,
    };

    match parse_reference(candidate).map_err(|e| failed(e.to_string()))? {
        Reference::Absolute(url) => Ok(url.into()),
        Reference::Relative => {
            let base_url = Url::parse(base).map_err(|e| failed(format!("bad base: {}", e)))?;
            base_url
                .join(candidate)
                .map(String::from)
                .map_err(|e| failed(e.to_string()))
        }
    }
}
