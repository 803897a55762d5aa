//! npm registry client for pinning dependency versions
//!
//! Looks up the `latest` dist-tag for each package to add. Resolution never
//! fails outward: an unreachable registry must not block the non-network parts
//! of the migration, so every failure path collapses to the `"latest"`
//! fallback literal and npm resolves it at install time instead.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

/// Public npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Version used when the registry cannot tell us better
pub const FALLBACK_VERSION: &str = "latest";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A dependency pinned to a version, ready to merge into the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub name: String,
    pub version: String,
}

impl ResolvedDependency {
    pub fn fallback(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: FALLBACK_VERSION.to_string(),
        }
    }
}

/// The slice of the registry packument we care about
#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
}

/// Client for the npm package registry
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_REGISTRY_URL)
    }

    /// Client against a non-default registry endpoint (also used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Resolve the latest published version of a package
    ///
    /// Infallible: network errors, non-JSON bodies and missing dist-tags all
    /// resolve to [`ResolvedDependency::fallback`].
    pub async fn resolve_latest(&self, name: &str) -> ResolvedDependency {
        match self.fetch_latest_tag(name).await {
            Some(version) => ResolvedDependency {
                name: name.to_string(),
                version,
            },
            None => ResolvedDependency::fallback(name),
        }
    }

    /// Resolve a list of packages, one lookup at a time
    ///
    /// Sequential on purpose: manifest edits must land in input-list order
    /// independent of response timing, and the registry sees at most one
    /// request from us at a time.
    pub async fn resolve_all(&self, names: &[&str]) -> Vec<ResolvedDependency> {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            resolved.push(self.resolve_latest(name).await);
        }
        resolved
    }

    async fn fetch_latest_tag(&self, name: &str) -> Option<String> {
        // Scoped names ("@scope/pkg") encode the inner slash on the registry.
        let encoded = name.replace('/', "%2F");
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), encoded);
        let response = self.http.get(&url).send().await.ok()?;
        let response = response.error_for_status().ok()?;
        let packument: Packument = response.json().await.ok()?;
        packument.dist_tags.get("latest").cloned()
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}
