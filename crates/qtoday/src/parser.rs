use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{Devotional, SUBTITLE_NOT_FOUND, TITLE_NOT_FOUND};
use crate::utils::normalize_whitespace;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("No devotional body text could be extracted from the page")]
    ExtractionEmpty,
}

/// Label that anchors the devotional section on the page ("today's word").
pub const MARKER_PHRASE: &str = "오늘의 말씀";

/// Paragraphs mentioning reflection (묵상) or summary (요약) belong to the commentary.
const EXCLUDED_KEYWORDS: [&str; 2] = ["묵상", "요약"];

const SECTION_TAGS: [&str; 3] = ["section", "article", "div"];
const HEADING_TAGS: [&str; 3] = ["h1", "h2", "h3"];
const TITLE_TAGS: [&str; 6] = ["h1", "h2", "h3", "strong", "em", "p"];
const SUBTITLE_TAGS: [&str; 5] = ["h1", "h2", "h3", "strong", "em"];
const BODY_TAGS: [&str; 3] = ["p", "li", "blockquote"];

const MAX_HEADING_CHARS: usize = 60;
const FALLBACK_PARAGRAPHS: usize = 8;

static RE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([가-힣A-Za-z.\s]+)\s+(\d+)\s*:\s*(\d+)(?:[-~]\s*\d+)?")
        .expect("invalid regex: scripture reference")
});
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("invalid selector: body"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyState {
    Idle,
    Collecting,
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn normalized_text(element: ElementRef) -> String {
    normalize_whitespace(&elem_text(element))
}

fn tag_name<'a>(element: ElementRef<'a>) -> &'a str {
    element.value().name()
}

fn contains_marker(element: ElementRef) -> bool {
    normalized_text(element).contains(MARKER_PHRASE)
}

fn is_short(text: &str) -> bool {
    text.chars().count() <= MAX_HEADING_CHARS
}

/// Every element strictly below `root`, in document order.
fn descendant_elements<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

fn find_marker_element(document: &Html) -> Option<ElementRef<'_>> {
    let mut current = document.root_element();
    if !contains_marker(current) {
        return None;
    }

    while let Some(child) = current
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| contains_marker(*child))
    {
        current = child;
    }

    Some(current)
}

fn body_element(document: &Html) -> ElementRef<'_> {
    document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element())
}

/// True when `container` holds a paragraph-like element outside the marker label itself.
fn holds_body_text(container: ElementRef, marker: ElementRef) -> bool {
    descendant_elements(container).any(|e| {
        BODY_TAGS.contains(&tag_name(e))
            && e.id() != marker.id()
            && !e.ancestors().any(|a| a.id() == marker.id())
    })
}

/// Picks the element the remaining stages search under: the nearest section-like ancestor of
/// the first marker label that also holds paragraph-like content, or the whole `<body>`.
pub(crate) fn locate_section(document: &Html) -> ElementRef<'_> {
    find_marker_element(document)
        .and_then(|marker| {
            marker
                .ancestors()
                .filter_map(ElementRef::wrap)
                .filter(|e| SECTION_TAGS.contains(&tag_name(*e)))
                .find(|e| holds_body_text(*e, marker))
        })
        .unwrap_or_else(|| body_element(document))
}

fn collect_body(root: ElementRef) -> Vec<String> {
    let parts = extract_body(root);
    if !parts.is_empty() {
        return parts;
    }
    log::debug!("Nothing collected after the marker, using leading paragraphs");
    leading_paragraphs(root)
}

/// Reduces a scripture reference such as `에스겔 21:1-17` to `에스겔 21:1`.
pub fn parse_reference(text: &str) -> Option<String> {
    let caps = RE_REFERENCE.captures(text)?;
    let label = caps[1].trim();
    if label.is_empty() {
        return None;
    }
    Some(format!("{} {}:{}", label, &caps[2], &caps[3]))
}

pub(crate) fn extract_title(root: ElementRef) -> Option<String> {
    descendant_elements(root)
        .filter(|e| TITLE_TAGS.contains(&tag_name(*e)))
        .find_map(|e| parse_reference(&normalized_text(e)))
}

pub(crate) fn extract_subtitle(root: ElementRef, title: Option<&str>) -> Option<String> {
    descendant_elements(root)
        .filter(|e| SUBTITLE_TAGS.contains(&tag_name(*e)))
        .map(normalized_text)
        .filter(|t| !t.is_empty() && !t.contains(MARKER_PHRASE))
        .filter(|t| title.is_none_or(|title| !t.contains(title)))
        .find(|t| is_short(t))
}

pub(crate) fn extract_body(root: ElementRef) -> Vec<String> {
    let mut state = BodyState::Idle;
    let mut parts = Vec::new();

    // Nested body tags (a <p> inside an <li>) each contribute their own text.
    for element in descendant_elements(root) {
        let text = normalized_text(element);
        if text.contains(MARKER_PHRASE) {
            state = BodyState::Collecting;
            continue;
        }

        match state {
            BodyState::Idle => {}
            BodyState::Collecting => {
                let tag = tag_name(element);
                if HEADING_TAGS.contains(&tag) && is_short(&text) {
                    state = BodyState::Idle;
                } else if BODY_TAGS.contains(&tag)
                    && !text.is_empty()
                    && !EXCLUDED_KEYWORDS.iter().any(|k| text.contains(k))
                {
                    parts.push(text);
                }
            }
        }
    }

    parts
}

fn leading_paragraphs(root: ElementRef) -> Vec<String> {
    descendant_elements(root)
        .filter(|e| tag_name(*e) == "p")
        .take(FALLBACK_PARAGRAPHS)
        .map(normalized_text)
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn parse_devotional(html: &str) -> Result<Devotional, ParseError> {
    let document = Html::parse_document(html);
    let root = locate_section(&document);
    log::debug!("Searching devotional under <{}>", tag_name(root));

    let title = extract_title(root);
    let subtitle = extract_subtitle(root, title.as_deref());

    let mut parts = collect_body(root);
    let body = body_element(&document);
    if parts.is_empty() && root.id() != body.id() {
        log::debug!("Section under <{}> was empty, retrying under <body>", tag_name(root));
        parts = collect_body(body);
    }
    if parts.is_empty() {
        return Err(ParseError::ExtractionEmpty);
    }

    if title.is_none() {
        log::warn!("No scripture reference found on the page");
    }

    Ok(Devotional {
        title: title.unwrap_or_else(|| TITLE_NOT_FOUND.to_string()),
        subtitle: subtitle.unwrap_or_else(|| SUBTITLE_NOT_FOUND.to_string()),
        verse: parts.join("\n\n"),
    })
}
