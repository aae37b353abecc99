//! HTML parser for extracting page text and links
//!
//! This module handles parsing HTML content to extract:
//! - Visible text (script and style contents excluded)
//! - Links to follow, with their anchor text

use super::{PageParser, ParsedLink, ParsedPage};
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text is never indexed
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Default `PageParser` built on scraper
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
///
/// Hrefs are returned as written; resolution against the page URL happens in the
/// crawler.
///
/// # Example
///
/// ```
/// use sumi_index::crawler::{HtmlParser, PageParser};
///
/// let html = r#"<html><body><p>Hello</p><a href="/next">Next page</a></body></html>"#;
/// let page = HtmlParser.parse(html.as_bytes());
/// assert!(page.text.contains("Hello"));
/// assert_eq!(page.links[0].href, "/next");
/// assert_eq!(page.links[0].anchor_text, "Next page");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl PageParser for HtmlParser {
    fn parse(&self, raw: &[u8]) -> ParsedPage {
        let html = String::from_utf8_lossy(raw);
        let document = Html::parse_document(&html);

        ParsedPage {
            text: extract_text(&document),
            links: extract_links(&document),
        }
    }
}

/// Collects the visible text of `<body>`, or of the whole document when there is no body
fn extract_text(document: &Html) -> String {
    let root = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut pieces = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed);
        }
    }

    pieces.join("\n")
}

/// Extracts all followable anchors from the HTML document
fn extract_links(document: &Html) -> Vec<ParsedLink> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(ParsedLink {
                href: href.trim().to_string(),
                anchor_text: anchor_text(element),
            })
        })
        .collect()
}

fn anchor_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> ParsedPage {
        HtmlParser.parse(html.as_bytes())
    }

    #[test]
    fn test_extract_body_text() {
        let page = parse(r#"<html><head><title>Title</title></head><body><h1>Heading</h1><p>Some text</p></body></html>"#);
        assert_eq!(page.text, "Heading\nSome text");
    }

    #[test]
    fn test_skip_script_and_style() {
        let page = parse(
            r#"<html><head><style>body { color: red }</style></head>
            <body><script>var hidden = 1;</script><p>Visible</p></body></html>"#,
        );
        assert_eq!(page.text, "Visible");
    }

    #[test]
    fn test_text_without_body_tag() {
        let page = parse("Just some words");
        assert!(page.text.contains("Just some words"));
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let page = HtmlParser.parse(b"<p>caf\xff words</p>");
        assert!(page.text.contains("words"));
    }

    #[test]
    fn test_extract_links_with_anchor_text() {
        let html = r#"<html><body><a href="https://other.com/page">Other  <b>site</b></a></body></html>"#;
        let page = parse(html);
        assert_eq!(
            page.links,
            vec![ParsedLink {
                href: "https://other.com/page".to_string(),
                anchor_text: "Other site".to_string(),
            }]
        );
    }

    #[test]
    fn test_link_without_text() {
        let page = parse(r#"<html><body><a href="/img"><img src="x.png"></a></body></html>"#);
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].anchor_text, "");
    }

    #[test]
    fn test_skip_download_link() {
        let html = r#"<html><body><a href="/file.pdf" download>Download</a></body></html>"#;
        assert!(parse(html).links.is_empty());
    }

    #[test]
    fn test_skip_anchor_without_href() {
        let html = r#"<html><body><a name="top">Top</a></body></html>"#;
        assert!(parse(html).links.is_empty());
    }

    #[test]
    fn test_follow_nofollow_links() {
        let html = r#"<html><body><a href="/page" rel="nofollow">Link</a></body></html>"#;
        let page = parse(html);
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].href, "/page");
    }

    #[test]
    fn test_multiple_links_keep_document_order() {
        let html = r#"
            <html>
            <body>
                <a href="/page1">Link 1</a>
                <a href="javascript:void(0)">Script</a>
                <a href="/page1">Again</a>
            </body>
            </html>
        "#;
        let hrefs: Vec<_> = parse(html).links.into_iter().map(|l| l.href).collect();
        assert_eq!(hrefs, vec!["/page1", "javascript:void(0)", "/page1"]);
    }
}
