// ABOUTME: Embedded builtin rule table and its loader.
// ABOUTME: Deserializes data/site_profiles.json into a ProfileRegistry.

//! Builtin profile loading.
//!
//! The publisher rule table ships inside the binary
//! (`data/site_profiles.json`), so deployments need no config files to
//! scrape the known sites. Exactly one entry must carry the site key
//! `default`; it becomes the registry's fallback profile.

use crate::error::ProfileError;
use crate::profile::{ExtractionProfile, ProfileRegistry};

/// Embedded publisher rule table.
const BUILTIN_PROFILES_JSON: &str = include_str!("../data/site_profiles.json");

/// Site key marking the fallback entry in a profile table.
const DEFAULT_KEY: &str = "default";

/// Loads the builtin registry from the embedded JSON table.
///
/// # Errors
///
/// Returns [`ProfileError`] when the embedded JSON is malformed or carries
/// no `default` entry. Either means the build is broken, so callers should
/// fail startup rather than continue.
pub fn load_builtin_registry() -> Result<ProfileRegistry, ProfileError> {
    registry_from_json(BUILTIN_PROFILES_JSON)
}

/// Builds a registry from a JSON array of profiles.
///
/// The entry whose `site` is `default` becomes the fallback profile; every
/// other entry is registered under its site key and aliases.
pub fn registry_from_json(json: &str) -> Result<ProfileRegistry, ProfileError> {
    let profiles: Vec<ExtractionProfile> =
        serde_json::from_str(json).map_err(ProfileError::parse)?;

    let mut default = None;
    let mut site_profiles = Vec::new();
    for profile in profiles {
        if profile.site == DEFAULT_KEY {
            default = Some(profile);
        } else {
            site_profiles.push(profile);
        }
    }

    let mut registry = ProfileRegistry::new(default.ok_or(ProfileError::MissingDefault)?);
    for profile in site_profiles {
        registry.register(profile);
    }
    Ok(registry)
}
