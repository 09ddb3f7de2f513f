// ABOUTME: Main library entry point for the Prensa news-article extractor.
// ABOUTME: Re-exports the public API: Scraper, Extractor, ProfileRegistry, backends, and result types.

//! Prensa - a domain-aware extractor for news articles.
//!
//! This crate fetches pages through a pluggable rendering backend and
//! extracts article title and body using per-publisher extraction profiles,
//! with a generic fallback for unknown sites. Failures never surface as
//! errors: every fetch produces a result, with sentinel text marking what
//! went wrong.
//!
//! # Example
//!
//! ```no_run
//! use prensa_extractor::{HttpBackend, Scraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scraper = Scraper::builder(HttpBackend::new()).build()?;
//!     let article = scraper
//!         .fetch_and_extract("https://www.jornada.com.mx/noticia")
//!         .await;
//!     println!("{}: {}", article.title, article.body);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod loader;
pub mod noise;
pub mod profile;
pub mod render;
pub mod result;
pub mod scrape;
pub mod selector;
pub mod site;

pub use crate::engine::Extractor;
pub use crate::error::{ProfileError, RenderError};
pub use crate::loader::load_builtin_registry;
pub use crate::profile::{
    BodyLocator, BodyStrategy, ExtractionProfile, ProfileRegistry, TitleLocator,
};
#[cfg(feature = "browser")]
pub use crate::render::ChromiumBackend;
pub use crate::render::{HttpBackend, RenderBackend, RenderSession, SessionConfig};
pub use crate::result::Extraction;
pub use crate::scrape::{ScrapeOptions, Scraper, ScraperBuilder};
pub use crate::site::{ensure_scheme, site_key};
