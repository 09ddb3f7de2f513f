// ABOUTME: Compiled CSS selector cache shared across extractions.
// ABOUTME: Compiles each selector once; invalid selectors cache as None.

//! Selector compilation cache.
//!
//! Profile selectors run on every request; compiling them each time would
//! dominate extraction cost. The cache compiles once per distinct selector
//! string and is warmed from the rule table at engine construction, so
//! request paths only ever take the read lock.

use std::collections::HashMap;
use std::sync::RwLock;

use dom_query::Matcher;
use once_cell::sync::Lazy;

use crate::profile::{BodyStrategy, ExtractionProfile, ProfileRegistry};

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Matcher>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `None` for selectors that do not compile; the failure is cached
/// too, so repeated bad lookups stay cheap.
pub fn get_or_compile(css: &str) -> Option<Matcher> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Matcher::new(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap();
    // Another thread may have inserted while we compiled.
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Precompiles every selector the registry can reach.
pub fn warm(registry: &ProfileRegistry) {
    let mut cache = SELECTOR_CACHE.write().unwrap();
    for profile in registry
        .profiles()
        .chain(std::iter::once(registry.default_profile()))
    {
        for css in profile_selectors(profile) {
            if !cache.contains_key(css) {
                let compiled = Matcher::new(css).ok();
                cache.insert(css.to_string(), compiled);
            }
        }
    }
}

/// Collects each selector string a profile can evaluate.
fn profile_selectors(profile: &ExtractionProfile) -> Vec<&str> {
    let mut selectors = Vec::new();
    for locator in &profile.title {
        if let Some(css) = locator.selector() {
            selectors.push(css);
        }
    }
    for body in std::iter::once(&profile.body).chain(profile.body_fallback.iter()) {
        selectors.push(body.selector.as_str());
        selectors.extend(body.clean.iter().map(|css| css.as_str()));
    }
    if let BodyStrategy::LedePlusBody { lede } = &profile.strategy {
        selectors.push(lede.as_str());
    }
    selectors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_builtin_registry;
    use crate::profile::TitleLocator;

    #[test]
    fn valid_selector_compiles_and_caches() {
        assert!(get_or_compile("div.entry-content").is_some());
        assert!(get_or_compile("div.entry-content").is_some());
    }

    #[test]
    fn invalid_selector_caches_as_none() {
        assert!(get_or_compile("[[[broken").is_none());
        assert!(get_or_compile("[[[broken").is_none());
    }

    #[test]
    fn warm_covers_builtin_selectors() {
        let registry = load_builtin_registry().unwrap();
        warm(&registry);
        assert!(get_or_compile("div.newsfull__body").is_some());
        assert!(get_or_compile("strong.bajada").is_some());
    }

    #[test]
    fn profile_selectors_reach_every_field() {
        let registry = load_builtin_registry().unwrap();
        let proceso = registry.get("www.proceso.com.mx").unwrap();
        let selectors = profile_selectors(proceso);
        assert!(selectors.contains(&"h1.titular"));
        assert!(selectors.contains(&"div.cuerpo-nota#cuerpo-nota"));
        assert!(selectors.contains(&"aside.relacionadas.con-foto.linea-1078"));
        assert!(selectors.contains(&"strong.bajada"));
    }

    #[test]
    fn document_title_contributes_no_selector() {
        assert_eq!(TitleLocator::DocumentTitle.selector(), None);
    }
}
