// ABOUTME: Extraction profile data model and the site-keyed rule table.
// ABOUTME: Defines title locators, body strategies, body locators, and the ProfileRegistry.

//! Extraction rule table.
//!
//! Each publisher gets an [`ExtractionProfile`]: an ordered list of title
//! locators, a body assembly strategy, a body locator carrying its removal
//! selectors, an optional fallback body locator, and an optional wait hint
//! for slow client-side rendering. Profiles are immutable after
//! registration; the registry is built once at startup and shared
//! read-only.
//!
//! Key behaviors:
//! - `lookup` never fails: unknown keys resolve to the default profile.
//! - Profiles may list alias keys (apex and `www.` hosts of one publisher).
//! - The body strategy is a closed enum dispatched by the engine, so adding
//!   a publisher means adding data, not code paths.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a single title candidate is located in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleLocator {
    /// Inner text of the first element matching a CSS selector.
    Css(String),
    /// `content` attribute of the first element matching a CSS selector
    /// (meta tags, in practice).
    Meta(String),
    /// Text of the document's `<title>` element.
    DocumentTitle,
}

impl TitleLocator {
    /// The CSS selector this locator evaluates, when it has one.
    pub fn selector(&self) -> Option<&str> {
        match self {
            TitleLocator::Css(css) | TitleLocator::Meta(css) => Some(css),
            TitleLocator::DocumentTitle => None,
        }
    }
}

/// How body text is assembled from the matched node(s).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyStrategy {
    /// Text of the first matching node.
    #[default]
    SingleNode,
    /// Text of every matching node, joined with single spaces.
    JoinParagraphs,
    /// A lede/summary node's text prepended to the first matching node's
    /// text. Either part may be absent; at least one must match.
    LedePlusBody { lede: String },
}

/// Where body content lives and what to strip out of it first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLocator {
    /// CSS selector for the content node(s).
    pub selector: String,
    /// Site-specific removal selectors, stripped before text extraction.
    #[serde(default)]
    pub clean: Vec<String>,
    /// Also strip the standard boilerplate list (ads, share widgets,
    /// figures, and friends).
    #[serde(default)]
    pub default_clean: bool,
}

impl BodyLocator {
    /// Locator with a selector and no removal rules.
    pub fn bare(selector: impl Into<String>) -> Self {
        BodyLocator {
            selector: selector.into(),
            clean: Vec::new(),
            default_clean: false,
        }
    }
}

/// Extraction rules for one publisher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionProfile {
    /// Primary site key (URL host).
    pub site: String,
    /// Additional hosts served by the same rules.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Ordered title locators; the first non-empty result wins.
    #[serde(default)]
    pub title: Vec<TitleLocator>,
    /// Body assembly strategy.
    #[serde(default)]
    pub strategy: BodyStrategy,
    /// Primary body locator.
    pub body: BodyLocator,
    /// Secondary body locator, tried when the primary yields nothing.
    #[serde(default)]
    pub body_fallback: Option<BodyLocator>,
    /// Seconds granted to client-side rendering when the body selector does
    /// not appear promptly. Only slow, script-heavy sites set this.
    #[serde(default)]
    pub wait_hint_secs: Option<u64>,
}

impl ExtractionProfile {
    /// The wait hint as a duration, if the profile declares one.
    pub fn wait_hint(&self) -> Option<Duration> {
        self.wait_hint_secs.map(Duration::from_secs)
    }
}

/// Site-keyed profile table with a guaranteed default.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: HashMap<String, ExtractionProfile>,
    default: ExtractionProfile,
}

impl ProfileRegistry {
    /// Creates a registry holding only the given default profile.
    pub fn new(default: ExtractionProfile) -> Self {
        ProfileRegistry {
            profiles: HashMap::new(),
            default,
        }
    }

    /// Registers a profile under its site key and each of its aliases.
    pub fn register(&mut self, profile: ExtractionProfile) {
        for alias in &profile.aliases {
            self.profiles.insert(alias.clone(), profile.clone());
        }
        self.profiles.insert(profile.site.clone(), profile);
    }

    /// Returns the registered profile for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&ExtractionProfile> {
        self.profiles.get(key)
    }

    /// Returns the profile for `key`, falling back to the default.
    pub fn lookup(&self, key: &str) -> &ExtractionProfile {
        self.profiles.get(key).unwrap_or(&self.default)
    }

    /// The default profile used for unregistered sites.
    pub fn default_profile(&self) -> &ExtractionProfile {
        &self.default
    }

    /// Iterates over the registered profiles (alias entries included).
    pub fn profiles(&self) -> impl Iterator<Item = &ExtractionProfile> {
        self.profiles.values()
    }

    /// Number of registered site keys, aliases included.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True when no site-specific profile is registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
