//! HTML parser for extracting anchor references
//!
//! Every start or self-closing `<a>` tag contributes the value of each of
//! its `href` attributes, duplicates included, in document order. Nothing is
//! filtered or resolved here; that is the URL policy's job.
//!
//! Extraction is a single forward pass over the markup. Truncated or
//! malformed input simply ends the pass early, and whatever was found before
//! that point is kept.

use html_escape::decode_html_entities;
use lol_html::{element, HtmlRewriter, Settings};

const ANCHOR_SELECTOR: &str = "a[href]";
const HREF_ATTR: &str = "href";

/// Extracts `href` values from anchor tags
///
/// Character references in the values are decoded; nothing else is touched.
///
/// # Example
///
/// ```
/// use sitewalk::crawler::extract_hrefs;
///
/// let html = r#"<p><a href="/b">B</a><a name="x"></a><a href="mailto:me@x">mail</a></p>"#;
/// assert_eq!(extract_hrefs(html), vec!["/b", "mailto:me@x"]);
/// ```
pub fn extract_hrefs(html: impl AsRef<[u8]>) -> Vec<String> {
    let mut hrefs = Vec::new();

    let outcome = {
        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!(ANCHOR_SELECTOR, |el| {
                    hrefs.extend(
                        el.attributes()
                            .iter()
                            .filter(|attr| attr.name().eq_ignore_ascii_case(HREF_ATTR))
                            .map(|attr| decode_html_entities(&attr.value()).into_owned()),
                    );
                    Ok(())
                })],
                // Never give up on markup the lexer finds ambiguous.
                strict: false,
                ..Settings::default()
            },
            |_: &[u8]| {},
        );

        match rewriter.write(html.as_ref()) {
            Ok(()) => rewriter.end(),
            Err(e) => Err(e),
        }
    };

    if let Err(e) = outcome {
        tracing::debug!("HTML scan stopped early: {}", e);
    }

    hrefs
}
