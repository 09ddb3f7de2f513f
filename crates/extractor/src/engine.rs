// ABOUTME: The extraction engine: profile-driven title and body resolution.
// ABOUTME: Dispatches body strategies, applies noise removal, normalizes and truncates.

//! Domain-aware article extraction.
//!
//! [`Extractor::extract`] turns rendered markup plus a site key into a
//! `(title, body)` pair. Failures stay in-band: every path yields a usable
//! result, with Spanish sentinel strings marking what went wrong.
//!
//! Key behaviors:
//! - Title locators run in profile order; the first non-empty text wins.
//! - Body resolution is two-tier: the profile's strategy over its primary
//!   and fallback locators, then, for unregistered sites only, an
//!   `article`/document-body rescue with the standard noise removal.
//! - Output is whitespace-collapsed and truncated to [`MAX_BODY_CHARS`].

use dom_query::{Document, Matcher};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::noise;
use crate::profile::{BodyLocator, BodyStrategy, ExtractionProfile, ProfileRegistry, TitleLocator};
use crate::result::Extraction;
use crate::selector::{self, get_or_compile};

/// Sentinel title when no locator matches.
///
/// Downstream consumers match on this exact phrasing; do not reword.
pub const TITLE_NOT_FOUND: &str = "Título no encontrado";

/// Maximum body length in characters before truncation.
pub const MAX_BODY_CHARS: usize = 5000;

/// Marker appended to truncated bodies.
pub const TRUNCATION_MARKER: &str = "...";

/// Rescue selectors for unregistered sites whose default-profile selector
/// found nothing.
const DOCUMENT_RESCUE_SELECTORS: &[&str] = &["article", "body"];

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Failure inside a body strategy. Converted to sentinel text by
/// [`Extractor::extract`], never propagated.
#[derive(Debug, Error)]
enum StrategyError {
    #[error("invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Profile-driven article extractor.
///
/// Holds the injected, immutable rule table; construct once and share.
#[derive(Debug, Clone)]
pub struct Extractor {
    registry: ProfileRegistry,
}

impl Extractor {
    /// Creates an extractor over the given rule table and warms the
    /// selector cache with every selector the table can reach.
    pub fn new(registry: ProfileRegistry) -> Self {
        selector::warm(&registry);
        Extractor { registry }
    }

    /// The rule table backing this extractor.
    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Extracts title and body from rendered markup for a site key.
    ///
    /// Never fails: missing content and strategy errors come back as
    /// sentinel strings in the result.
    pub fn extract(&self, markup: &str, site_key: &str) -> Extraction {
        let doc = Document::from(markup);
        noise::strip_document(&doc);

        let registered = self.registry.get(site_key).is_some();
        let profile = self.registry.lookup(site_key);
        debug!(site_key, registered, "extracting article");

        let title =
            resolve_title(&doc, profile).unwrap_or_else(|| TITLE_NOT_FOUND.to_string());

        let body = match resolve_body(&doc, profile, registered) {
            Ok(Some(text)) => text,
            Ok(None) => format!(
                "No se pudo encontrar el cuerpo de la noticia para el selector {}.",
                profile.body.selector
            ),
            Err(err) => format!("Error al extraer el cuerpo: {}", err),
        };

        Extraction {
            title,
            body: truncate_chars(&normalize_whitespace(&body), MAX_BODY_CHARS),
        }
    }
}

/// Runs the profile's title locators in order; first non-empty text wins.
///
/// Locators whose selector fails to compile are skipped.
fn resolve_title(doc: &Document, profile: &ExtractionProfile) -> Option<String> {
    for locator in &profile.title {
        let candidate = match locator {
            TitleLocator::Css(css) => first_text(doc, css),
            TitleLocator::Meta(css) => first_attr(doc, css, "content"),
            TitleLocator::DocumentTitle => first_text(doc, "title"),
        };
        if let Some(text) = candidate {
            return Some(text);
        }
    }
    None
}

/// Inner text of the first match with non-empty normalized text.
fn first_text(doc: &Document, css: &str) -> Option<String> {
    let matcher = get_or_compile(css)?;
    doc.select_matcher(&matcher)
        .iter()
        .map(|el| normalize_whitespace(&el.text()))
        .find(|text| !text.is_empty())
}

/// Trimmed attribute of the first match carrying a non-empty value.
fn first_attr(doc: &Document, css: &str, attr: &str) -> Option<String> {
    let matcher = get_or_compile(css)?;
    doc.select_matcher(&matcher)
        .iter()
        .filter_map(|el| el.attr(attr).map(|value| value.trim().to_string()))
        .find(|value| !value.is_empty())
}

/// Two-tier body resolution: the profile strategy over primary and fallback
/// locators, then the document rescue for unregistered sites.
fn resolve_body(
    doc: &Document,
    profile: &ExtractionProfile,
    registered: bool,
) -> Result<Option<String>, StrategyError> {
    if let Some(text) = run_strategy(doc, &profile.strategy, &profile.body)? {
        return Ok(Some(text));
    }
    if let Some(fallback) = &profile.body_fallback {
        if let Some(text) = run_strategy(doc, &profile.strategy, fallback)? {
            return Ok(Some(text));
        }
    }
    // Registered sites that miss every locator go straight to the sentinel;
    // only unknown layouts earn the blanket rescue.
    if !registered {
        for css in DOCUMENT_RESCUE_SELECTORS {
            let rescue = BodyLocator {
                selector: (*css).to_string(),
                clean: Vec::new(),
                default_clean: true,
            };
            if let Some(text) = run_strategy(doc, &BodyStrategy::SingleNode, &rescue)? {
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

/// Executes one body strategy against one locator.
///
/// Returns `Ok(None)` when nothing matched or every match was empty after
/// cleaning.
fn run_strategy(
    doc: &Document,
    strategy: &BodyStrategy,
    locator: &BodyLocator,
) -> Result<Option<String>, StrategyError> {
    let matcher = compile(&locator.selector)?;
    match strategy {
        BodyStrategy::SingleNode => {
            let node = match doc.select_matcher(&matcher).iter().next() {
                Some(node) => node,
                None => return Ok(None),
            };
            noise::strip_fragment(&node, locator);
            Ok(non_empty(node.text().to_string()))
        }
        BodyStrategy::JoinParagraphs => {
            let mut parts = Vec::new();
            for node in doc.select_matcher(&matcher).iter() {
                noise::strip_fragment(&node, locator);
                let text = node.text().trim().to_string();
                if !text.is_empty() {
                    parts.push(text);
                }
            }
            Ok(non_empty(parts.join(" ")))
        }
        BodyStrategy::LedePlusBody { lede } => {
            let lede_matcher = compile(lede)?;
            let lede_text = doc
                .select_matcher(&lede_matcher)
                .iter()
                .next()
                .map(|node| node.text().trim().to_string())
                .unwrap_or_default();
            let body_text = match doc.select_matcher(&matcher).iter().next() {
                Some(node) => {
                    noise::strip_fragment(&node, locator);
                    node.text().trim().to_string()
                }
                None => String::new(),
            };
            let combined = [lede_text, body_text]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            Ok(non_empty(combined))
        }
    }
}

fn compile(css: &str) -> Result<Matcher, StrategyError> {
    get_or_compile(css).ok_or_else(|| StrategyError::InvalidSelector(css.to_string()))
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Collapses every whitespace run (newlines included) to one space and
/// trims the ends. Idempotent.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Truncates to `max` characters, appending the truncation marker when the
/// input is longer. Counts characters, never bytes.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_builtin_registry;
    use crate::profile::ProfileRegistry;
    use pretty_assertions::assert_eq;

    fn builtin_extractor() -> Extractor {
        Extractor::new(load_builtin_registry().unwrap())
    }

    fn synthetic_extractor(profile: ExtractionProfile) -> Extractor {
        let default = ExtractionProfile {
            site: "default".to_string(),
            title: vec![TitleLocator::Css("h1".to_string())],
            body: BodyLocator {
                selector: "article".to_string(),
                clean: Vec::new(),
                default_clean: true,
            },
            ..Default::default()
        };
        let mut registry = ProfileRegistry::new(default);
        registry.register(profile);
        Extractor::new(registry)
    }

    #[test]
    fn title_prefers_earlier_locators() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><head>
                <title>Doc Title</title>
                <meta property="og:title" content="OG Title">
            </head><body>
                <h1>Heading Title</h1>
                <article>Texto del cuerpo</article>
            </body></html>
        "#;
        let result = extractor.extract(markup, "example.com");
        assert_eq!(result.title, "Heading Title");
    }

    #[test]
    fn title_falls_through_to_meta_content() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><head>
                <meta property="og:title" content="  OG Title  ">
            </head><body><article>Texto</article></body></html>
        "#;
        let result = extractor.extract(markup, "example.com");
        assert_eq!(result.title, "OG Title");
    }

    #[test]
    fn title_uses_document_title_element() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><head><title>Solo el titulo</title></head>
            <body><article>Texto</article></body></html>
        "#;
        let result = extractor.extract(markup, "example.com");
        assert_eq!(result.title, "Solo el titulo");
    }

    #[test]
    fn title_sentinel_when_nothing_matches() {
        let extractor = builtin_extractor();
        let markup = "<html><body><article>Texto</article></body></html>";
        let result = extractor.extract(markup, "example.com");
        assert_eq!(result.title, TITLE_NOT_FOUND);
    }

    #[test]
    fn default_profile_extracts_article_with_collapsed_whitespace() {
        let extractor = builtin_extractor();
        let markup = "<html><body><h1>Foo</h1><article>Bar  baz</article></body></html>";
        let result = extractor.extract(markup, "example.com");
        assert_eq!(result.title, "Foo");
        assert_eq!(result.body, "Bar baz");
    }

    #[test]
    fn unregistered_site_rescues_from_document_body() {
        let extractor = builtin_extractor();
        let markup = "<html><body><p>Texto suelto en la pagina.</p></body></html>";
        let result = extractor.extract(markup, "example.com");
        assert_eq!(result.body, "Texto suelto en la pagina.");
    }

    #[test]
    fn registered_site_without_body_yields_selector_sentinel() {
        let extractor = builtin_extractor();
        let markup = "<html><body><h1>Titular</h1><p>Texto</p></body></html>";
        let result = extractor.extract(markup, "www.excelsior.com.mx");
        assert_eq!(
            result.body,
            "No se pudo encontrar el cuerpo de la noticia para el selector div.field-items."
        );
        assert!(!result.body.is_empty());
    }

    #[test]
    fn single_node_strategy_reads_direct_text() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><body>
                <h1>Titular</h1>
                <div class="field-items">Cuerpo directo de la nota.</div>
            </body></html>
        "#;
        let result = extractor.extract(markup, "www.excelsior.com.mx");
        assert_eq!(result.body, "Cuerpo directo de la nota.");
    }

    #[test]
    fn join_paragraphs_strategy_concatenates_matches() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><body>
                <h1 class="article-headline">Titular</h1>
                <div class="body-article">
                    <p class="paragraph" data-mrf-recirculation="Links inline">Uno.</p>
                    <p class="paragraph" data-mrf-recirculation="Links inline">Dos.</p>
                    <p class="paragraph">Ignorado.</p>
                </div>
            </body></html>
        "#;
        let result = extractor.extract(markup, "www.infobae.com");
        assert_eq!(result.body, "Uno. Dos.");
    }

    #[test]
    fn join_paragraphs_uses_fallback_selector() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><body>
                <h1 class="title">Titular</h1>
                <p class="sc__font-paragraph" itemprop="description">Fuera de columna.</p>
            </body></html>
        "#;
        let result = extractor.extract(markup, "www.eluniversal.com.mx");
        assert_eq!(result.body, "Fuera de columna.");
    }

    #[test]
    fn lede_plus_body_combines_both_parts() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><body>
                <h1 class="titular">Titular</h1>
                <strong class="bajada">La bajada.</strong>
                <div class="cuerpo-nota" id="cuerpo-nota">
                    El cuerpo.
                    <aside class="relacionadas con-foto linea-1078">Relacionadas</aside>
                </div>
            </body></html>
        "#;
        let result = extractor.extract(markup, "www.proceso.com.mx");
        assert_eq!(result.body, "La bajada. El cuerpo.");
    }

    #[test]
    fn lede_alone_suffices_when_body_is_missing() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><body>
                <h1 class="titular">Titular</h1>
                <strong class="bajada">Solo la bajada.</strong>
            </body></html>
        "#;
        let result = extractor.extract(markup, "www.proceso.com.mx");
        assert_eq!(result.body, "Solo la bajada.");
    }

    #[test]
    fn sinembargo_strips_figures_before_text() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><body>
                <h1>Titular</h1>
                <div class="entry-content">
                    Texto principal.
                    <figure><figcaption>Foto: Agencia</figcaption></figure>
                </div>
            </body></html>
        "#;
        let result = extractor.extract(markup, "www.sinembargo.mx");
        assert_eq!(result.body, "Texto principal.");
    }

    #[test]
    fn debate_strips_related_news_and_list_items() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><body>
                <h1 class="newsfull__title">Titular</h1>
                <div class="newsfull__body">
                    Texto de la nota.
                    <div class="ck-related-news">Te puede interesar</div>
                    <ul><li>enlace uno</li><li>enlace dos</li></ul>
                </div>
            </body></html>
        "#;
        let result = extractor.extract(markup, "www.debate.com.mx");
        assert_eq!(result.body, "Texto de la nota.");
    }

    #[test]
    fn aristegui_falls_back_to_contenido_with_clean() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><body>
                <h1 class="entry-title">Titular</h1>
                <div class="contenido">
                    Texto recuperado.
                    <div class="share">compartir</div>
                </div>
            </body></html>
        "#;
        let result = extractor.extract(markup, "aristeguinoticias.com");
        assert_eq!(result.body, "Texto recuperado.");
    }

    #[test]
    fn invalid_selector_becomes_extraction_error_sentinel() {
        let profile = ExtractionProfile {
            site: "broken.example".to_string(),
            title: vec![TitleLocator::Css("h1".to_string())],
            body: BodyLocator::bare("[[[broken"),
            ..Default::default()
        };
        let extractor = synthetic_extractor(profile);
        let markup = "<html><body><h1>t</h1><p>x</p></body></html>";
        let result = extractor.extract(markup, "broken.example");
        assert!(
            result.body.starts_with("Error al extraer el cuerpo:"),
            "unexpected body: {}",
            result.body
        );
    }

    #[test]
    fn invalid_title_selector_is_skipped() {
        let profile = ExtractionProfile {
            site: "broken-title.example".to_string(),
            title: vec![
                TitleLocator::Css("[[[broken".to_string()),
                TitleLocator::Css("h1".to_string()),
            ],
            body: BodyLocator::bare("article"),
            ..Default::default()
        };
        let extractor = synthetic_extractor(profile);
        let markup = "<html><body><h1>Titular</h1><article>x</article></body></html>";
        let result = extractor.extract(markup, "broken-title.example");
        assert_eq!(result.title, "Titular");
    }

    #[test]
    fn body_is_truncated_at_the_character_limit() {
        let extractor = builtin_extractor();
        let long_body = "palabra ".repeat(2000);
        let markup = format!("<html><body><h1>t</h1><article>{}</article></body></html>", long_body);
        let result = extractor.extract(&markup, "example.com");
        assert_eq!(
            result.body.chars().count(),
            MAX_BODY_CHARS + TRUNCATION_MARKER.chars().count()
        );
        assert!(result.body.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("  hola \n\t mundo  "), "hola mundo");
        assert_eq!(normalize_whitespace("sin cambios"), "sin cambios");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn normalize_whitespace_is_idempotent() {
        let once = normalize_whitespace("a \n b\t\tc");
        assert_eq!(normalize_whitespace(&once), once);
    }

    #[test]
    fn truncate_chars_laws() {
        let short = "corto";
        assert_eq!(truncate_chars(short, MAX_BODY_CHARS), short);

        let long: String = "x".repeat(MAX_BODY_CHARS + 10);
        let truncated = truncate_chars(&long, MAX_BODY_CHARS);
        assert_eq!(
            truncated.chars().count(),
            MAX_BODY_CHARS + TRUNCATION_MARKER.chars().count()
        );
        assert_eq!(&truncated[..MAX_BODY_CHARS], &long[..MAX_BODY_CHARS]);

        // Counts characters, not bytes.
        let accented: String = "á".repeat(MAX_BODY_CHARS + 1);
        let truncated = truncate_chars(&accented, MAX_BODY_CHARS);
        assert_eq!(
            truncated.chars().count(),
            MAX_BODY_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn scripts_and_chrome_never_leak_into_body() {
        let extractor = builtin_extractor();
        let markup = r#"
            <html><body>
                <h1>t</h1>
                <nav>menu menu</nav>
                <article>Contenido <script>var x = "basura";</script>real.</article>
                <footer>pie</footer>
            </body></html>
        "#;
        let result = extractor.extract(markup, "example.com");
        assert_eq!(result.body, "Contenido real.");
    }
}
