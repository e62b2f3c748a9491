//! HTML parser for extracting resources and links
//!
//! This module handles parsing page content to extract:
//! - Resource URLs to download (stylesheets, scripts, images, media, frames)
//! - Same-origin hyperlinks to crawl next
//! - The indented serialization written to disk

use crate::crawler::pretty::pretty_print;
use crate::url::{resolve_href, Origin};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements that reference resources, with the attribute holding the URL
const RESOURCE_ATTRIBUTES: &[(&str, &str)] = &[
    ("link", "href"),
    ("script", "src"),
    ("img", "src"),
    ("video", "src"),
    ("audio", "src"),
    ("iframe", "src"),
];

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Indented serialization of the parsed document
    pub html: String,

    /// Resource URLs in document order, without duplicates
    pub resources: Vec<Url>,

    /// Same-origin hyperlinks in document order, without duplicates
    pub links: Vec<Url>,

    /// Number of hyperlinks dropped because they leave the origin
    pub off_origin_links: usize,
}

/// Parses page content and extracts resources and same-origin links
///
/// Parsing never fails: malformed markup is repaired the way browsers do.
///
/// # Extraction Rules
///
/// **Resources:** `link@href`, `script@src`, `img@src`, `video@src`,
/// `audio@src`, `iframe@src`
///
/// **Links:** every `a@href` whose resolved URL belongs to `origin`
///
/// Both are resolved against `page_url`. `javascript:`, `mailto:`, `tel:`,
/// `data:` and fragment-only references are ignored.
///
/// # Example
///
/// ```
/// use site_mirror::crawler::parse_page;
/// use site_mirror::url::Origin;
/// use url::Url;
///
/// let html = r#"<html><body><img src="/logo.png"><a href="/about">About</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let origin = Origin::of(&page_url).unwrap();
///
/// let parsed = parse_page(html, &page_url, &origin);
/// assert_eq!(parsed.resources[0].as_str(), "https://example.com/logo.png");
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/about");
/// ```
pub fn parse_page(html: &str, page_url: &Url, origin: &Origin) -> ParsedPage {
    let document = Html::parse_document(html);

    let resources = extract_resources(&document, page_url);
    let (links, off_origin_links) = extract_links(&document, page_url, origin);

    ParsedPage {
        html: pretty_print(&document),
        resources,
        links,
        off_origin_links,
    }
}

/// Extracts resource URLs in document order
fn extract_resources(document: &Html, page_url: &Url) -> Vec<Url> {
    let selector_text = RESOURCE_ATTRIBUTES
        .iter()
        .map(|(tag, attr)| format!("{}[{}]", tag, attr))
        .collect::<Vec<_>>()
        .join(", ");

    let mut resources = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(selector) = Selector::parse(&selector_text) {
        for element in document.select(&selector) {
            let name = element.value().name();
            let Some((_, attr)) = RESOURCE_ATTRIBUTES.iter().find(|(tag, _)| *tag == name) else {
                continue;
            };

            if let Some(url) = element
                .value()
                .attr(attr)
                .and_then(|value| resolve_href(value, page_url))
            {
                if seen.insert(url.as_str().to_string()) {
                    resources.push(url);
                }
            }
        }
    }

    resources
}

/// Extracts same-origin hyperlinks and counts the ones filtered out
fn extract_links(document: &Html, page_url: &Url, origin: &Origin) -> (Vec<Url>, usize) {
    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let mut off_origin = 0;

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_href(href, page_url))
            else {
                continue;
            };

            if !origin.contains(&url) {
                off_origin += 1;
                continue;
            }

            if seen.insert(url.as_str().to_string()) {
                links.push(url);
            }
        }
    }

    (links, off_origin)
}
