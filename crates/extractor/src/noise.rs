// ABOUTME: Noise removal for parsed article documents.
// ABOUTME: Strips structural chrome document-wide and boilerplate inside matched fragments.

//! Noise filtering.
//!
//! Two removal passes keep extracted text clean:
//! - a document-wide pass dropping structural chrome (scripts, styles,
//!   navigation, footers, asides, inline frames) before any selector runs;
//! - a per-fragment pass dropping the profile's removal selectors and,
//!   where the profile opts in, the standard boilerplate list.
//!
//! Both passes are idempotent: removed nodes cannot match again. Comment
//! nodes never surface in text extraction, so they need no removal pass.

use dom_query::{Document, Selection};

use crate::profile::BodyLocator;
use crate::selector::get_or_compile;

/// Structural chrome removed from every document before extraction.
pub const STRUCTURAL_NOISE_SELECTORS: &[&str] =
    &["script", "style", "nav", "footer", "aside", "iframe"];

/// Standard boilerplate stripped by the generic strategy and by body
/// locators that set `default_clean`.
pub const DEFAULT_REMOVAL_SELECTORS: &[&str] = &[
    "div.ad",
    "div.share",
    "div.comments",
    "div.related-posts",
    "div.social",
    "div.tags",
    "p.author",
    "div.meta",
    "div.sharedaddy",
    "div.entry-meta",
    "figure",
    "aside",
    "iframe",
];

/// Removes structural chrome from the whole document, in place.
pub fn strip_document(doc: &Document) {
    for css in STRUCTURAL_NOISE_SELECTORS {
        if let Some(matcher) = get_or_compile(css) {
            doc.select_matcher(&matcher).remove();
        }
    }
}

/// Strips a body locator's removal selectors inside one matched fragment.
pub fn strip_fragment(fragment: &Selection, locator: &BodyLocator) {
    for css in &locator.clean {
        remove_within(fragment, css);
    }
    if locator.default_clean {
        for css in DEFAULT_REMOVAL_SELECTORS {
            remove_within(fragment, css);
        }
    }
}

fn remove_within(fragment: &Selection, css: &str) {
    if let Some(matcher) = get_or_compile(css) {
        fragment.select_matcher(&matcher).remove();
    }
}
