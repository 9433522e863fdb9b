//! Headline extraction from page HTML.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::{FALLBACK_MIN_CHARS, FALLBACK_MIN_WORDS};
use crate::utils::parse_selector_unsafe;
use crate::utils::sanitize::{collapse_whitespace, word_count};

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("a[href]", "link extraction"));

/// A headline text and the absolute URL it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    pub text: String,
    pub url: String,
}

/// Collects every element matching `selector` that is tied to a link.
///
/// The link is the element itself when it is an `<a href>`, otherwise the
/// nearest enclosing `<a href>`, otherwise the first `<a href>` inside it.
/// Hrefs are resolved against `base`; elements without text or without a
/// usable link are skipped.
pub fn extract_headlines(document: &Html, base: &Url, selector: &Selector) -> Vec<ExtractedLink> {
    document
        .select(selector)
        .filter_map(|element| {
            let text = collapse_whitespace(&element.text().collect::<String>());
            if text.is_empty() {
                return None;
            }
            let href = link_for(element)?;
            let url = resolve(base, href)?;
            Some(ExtractedLink { text, url })
        })
        .collect()
}

/// Every `<a href>` whose text looks like a headline.
///
/// Used when the source selector finds nothing on a rendered page: a link
/// qualifies with more than `FALLBACK_MIN_WORDS` words and more than
/// `FALLBACK_MIN_CHARS` characters.
pub fn extract_fallback_links(document: &Html, base: &Url) -> Vec<ExtractedLink> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|anchor| {
            let text = collapse_whitespace(&anchor.text().collect::<String>());
            if word_count(&text) <= FALLBACK_MIN_WORDS || text.chars().count() <= FALLBACK_MIN_CHARS {
                return None;
            }
            let url = resolve(base, anchor.value().attr("href")?)?;
            Some(ExtractedLink { text, url })
        })
        .collect()
}

fn link_for(element: ElementRef<'_>) -> Option<&str> {
    if element.value().name() == "a" {
        if let Some(href) = element.value().attr("href") {
            return Some(href);
        }
    }
    let enclosing = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "a" && a.value().attr("href").is_some());
    if let Some(anchor) = enclosing {
        return anchor.value().attr("href");
    }
    element
        .select(&LINK_SELECTOR)
        .next()
        .and_then(|a| a.value().attr("href"))
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    match base.join(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url.to_string()),
        Ok(_) => None,
        Err(e) => {
            log::debug!("Skipping unresolvable href '{}': {}", href, e);
            None
        }
    }
}
