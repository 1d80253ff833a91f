//! Superhero data client
//!
//! Reads character data from superheroapi.com when a token is configured, or
//! from the akabab fallback dataset (same characters, no token) otherwise.
//! Every lookup goes through the injected [`CacheStore`] first; upstream
//! failures of any kind surface as `None` or an empty list.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::normalize::{
    extract_detail, flat_detail, normalize_appearance, normalize_biography, normalize_character,
    normalize_powerstats, normalize_summary,
};
use super::transport::{FetchError, ReqwestTransport, Transport};
use super::{image, Appearance, Biography, Character, Detail, HeroSummary, Powerstats};
use crate::cache::CacheStore;

/// Base URL of the token-gated API; the token goes right after it
pub const API_BASE: &str = "https://superheroapi.com/api";

/// Full dataset served without a token
pub const FALLBACK_URL: &str =
    "https://cdn.jsdelivr.net/gh/akabab/superhero-api@0.3.0/api/all.json";

/// Ids walked when building the hero list from the token-gated API
pub const DEFAULT_ID_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Deadline for character and field-group requests
const API_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for the bulk fallback dataset
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(15);

/// Upstream locations used by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Token-gated API base
    pub api_base: String,
    /// Fallback dataset document
    pub fallback_url: String,
    /// Image host used by [`SuperheroClient::hero_image_url`]
    pub image_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            fallback_url: FALLBACK_URL.to_string(),
            image_base: image::IMAGE_BASE.to_string(),
        }
    }
}

/// Cache-first client over the two superhero data sources
///
/// Holds no state besides the token, the cache handle and the transport, so
/// it is cheap to build per request.
pub struct SuperheroClient<T = ReqwestTransport> {
    token: Option<String>,
    cache: Arc<dyn CacheStore>,
    transport: T,
    endpoints: Endpoints,
}

impl SuperheroClient<ReqwestTransport> {
    /// Creates a client using the default HTTP transport
    ///
    /// A blank token is treated as no token (anonymous mode).
    pub fn new(token: Option<String>, cache: Arc<dyn CacheStore>) -> Self {
        Self::with_transport(token, cache, ReqwestTransport::new())
    }
}

impl<T: Transport> SuperheroClient<T> {
    /// Creates a client with a custom transport
    pub fn with_transport(token: Option<String>, cache: Arc<dyn CacheStore>, transport: T) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Self {
            token,
            cache,
            transport,
            endpoints: Endpoints::default(),
        }
    }

    /// Replaces the upstream locations
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Whether the client runs without a token on the fallback dataset
    pub fn is_anonymous(&self) -> bool {
        self.token.is_none()
    }

    /// Image URL for a hero on the configured image host
    pub fn hero_image_url(&self, hero_id: impl Display, name: &str) -> String {
        image::image_url(&self.endpoints.image_base, hero_id, name)
    }

    /// Builds a primary API URL for `path`
    fn api_url(&self, path: &str) -> Result<String, FetchError> {
        let token = self.token.as_deref().ok_or(FetchError::MissingToken)?;
        Ok(format!(
            "{}/{}/{}",
            self.endpoints.api_base.trim_end_matches('/'),
            token,
            path.trim_start_matches('/')
        ))
    }

    /// Fetches `path` from the primary API
    ///
    /// This is the only operation that reports a missing token; everything
    /// above it turns errors into "not found".
    pub async fn fetch_api(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.api_url(path)?;
        info!(path = %path, "fetching from superhero API");

        let data = self.transport.get_json(&url, API_TIMEOUT).await?;
        let obj = data
            .as_object()
            .ok_or(FetchError::UnexpectedShape("expected a JSON object"))?;

        if obj.get("response").and_then(Value::as_str) == Some("error") {
            let message = obj
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(FetchError::ErrorResponse(message.to_string()));
        }

        Ok(data)
    }

    /// Downloads the whole fallback dataset
    async fn fetch_fallback(&self) -> Result<Vec<Value>, FetchError> {
        info!(url = %self.endpoints.fallback_url, "fetching fallback dataset");

        match self
            .transport
            .get_json(&self.endpoints.fallback_url, FALLBACK_TIMEOUT)
            .await?
        {
            Value::Array(entries) => Ok(entries),
            _ => Err(FetchError::UnexpectedShape("expected a JSON array")),
        }
    }

    /// Writes one cache entry, logging instead of failing
    fn store(&self, key: &str, value: Value) {
        if let Err(e) = self.cache.set(key, value) {
            warn!(key = %key, error = %e, "cache write failed");
        }
    }

    /// Reads the hero-list snapshot, if one is cached
    fn cached_hero_list(&self) -> Option<Vec<HeroSummary>> {
        let heroes = self.cache.get_hero_list()?;
        debug!(count = heroes.len(), "hero list cache hit");
        Some(heroes.iter().filter_map(normalize_summary).collect())
    }

    /// Caches the hero-list snapshot
    fn store_hero_list(&self, heroes: &[HeroSummary]) {
        let values = heroes
            .iter()
            .filter_map(|hero| serde_json::to_value(hero).ok())
            .collect();

        if let Err(e) = self.cache.set_hero_list(values) {
            warn!(error = %e, "hero list cache write failed");
        }
    }

    /// Loads the fallback dataset into the cache, once per cold cache
    ///
    /// Every entry is cached under `char_{id}` and the normalized list is
    /// cached as the snapshot. A cached snapshot short-circuits the download.
    async fn load_fallback(&self) -> Vec<HeroSummary> {
        if let Some(heroes) = self.cached_hero_list() {
            return heroes;
        }

        let entries = match self.fetch_fallback().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "fallback dataset unavailable");
                return Vec::new();
            }
        };

        let mut heroes = Vec::with_capacity(entries.len());
        let mut batch = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(summary) = normalize_summary(&entry) else {
                debug!("skipping fallback entry without id");
                continue;
            };
            batch.push((format!("char_{}", summary.id), entry));
            heroes.push(summary);
        }

        if let Err(e) = self.cache.set_many(batch) {
            warn!(error = %e, "caching fallback characters failed");
        }
        if !heroes.is_empty() {
            self.store_hero_list(&heroes);
        }

        info!(count = heroes.len(), "loaded fallback dataset");
        heroes
    }

    /// Full character record as served by its upstream
    ///
    /// Checks `char_{id}` first. On a miss, token mode asks the API (caching
    /// only successful answers); anonymous mode loads the fallback dataset and
    /// looks again.
    pub async fn get_character(&self, id: impl Display) -> Option<Value> {
        let key = format!("char_{}", id);
        if let Some(cached) = self.cache.get(&key) {
            debug!(key = %key, "cache hit");
            return Some(cached);
        }
        debug!(key = %key, "cache miss");

        if self.token.is_some() {
            return match self.fetch_api(&id.to_string()).await {
                Ok(data) => {
                    self.store(&key, data.clone());
                    Some(data)
                }
                Err(e) => {
                    debug!(id = %id, error = %e, "character not found");
                    None
                }
            };
        }

        self.load_fallback().await;
        self.cache.get(&key)
    }

    /// Full character record in canonical form
    pub async fn get_character_record(&self, id: impl Display) -> Option<Character> {
        normalize_character(&self.get_character(id).await?)
    }

    /// Appearance of a character
    pub async fn get_appearance(&self, id: impl Display) -> Option<Detail<Appearance>> {
        self.get_field_group(id, "appearance", normalize_appearance)
            .await
    }

    /// Biography of a character
    pub async fn get_biography(&self, id: impl Display) -> Option<Detail<Biography>> {
        self.get_field_group(id, "biography", normalize_biography)
            .await
    }

    /// Power ratings of a character
    pub async fn get_powerstats(&self, id: impl Display) -> Option<Detail<Powerstats>> {
        self.get_field_group(id, "powerstats", normalize_powerstats)
            .await
    }

    /// Extracts `group` from the full record, or uses the field endpoint
    ///
    /// The dedicated `{group}_{id}` entry and `{id}/{group}` endpoint are only
    /// consulted when no full record is available.
    async fn get_field_group<F>(
        &self,
        id: impl Display,
        group: &str,
        normalize: fn(&Map<String, Value>) -> F,
    ) -> Option<Detail<F>> {
        let id = id.to_string();

        let full = self.get_character(&id).await;
        if let Some(detail) = full
            .as_ref()
            .filter(|record| !is_empty_record(record))
            .and_then(|record| extract_detail(record, group, normalize))
        {
            return Some(detail);
        }

        let key = format!("{}_{}", group, id);
        if let Some(cached) = self.cache.get(&key) {
            debug!(key = %key, "cache hit");
            return flat_detail(&cached, normalize);
        }

        if self.token.is_none() {
            return None;
        }

        match self.fetch_api(&format!("{}/{}", id, group)).await {
            Ok(data) => {
                self.store(&key, data.clone());
                flat_detail(&data, normalize)
            }
            Err(e) => {
                debug!(id = %id, group = %group, error = %e, "field group not found");
                None
            }
        }
    }

    /// Hero list over the default id range
    pub async fn get_hero_list(&self) -> Vec<HeroSummary> {
        self.get_hero_list_in(DEFAULT_ID_RANGE).await
    }

    /// Hero list, cache-first on the snapshot
    ///
    /// Anonymous mode loads the whole fallback dataset and ignores `ids`.
    /// Token mode looks up each id in turn and skips those not found; an
    /// empty result is not cached so the next call retries.
    pub async fn get_hero_list_in(&self, ids: impl IntoIterator<Item = u32>) -> Vec<HeroSummary> {
        if let Some(heroes) = self.cached_hero_list() {
            return heroes;
        }

        if self.token.is_none() {
            return self.load_fallback().await;
        }

        let mut heroes = Vec::new();
        for id in ids {
            let Some(record) = self.get_character(id).await else {
                continue;
            };
            match normalize_summary(&record) {
                Some(summary) => heroes.push(summary),
                None => debug!(id, "skipping character without id"),
            }
        }

        if !heroes.is_empty() {
            self.store_hero_list(&heroes);
        }
        heroes
    }
}

/// An empty object carries no data and counts as "no record"
fn is_empty_record(record: &Value) -> bool {
    matches!(record, Value::Object(obj) if obj.is_empty()) || record.is_null()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManagedCache, SharedCache};
    use async_trait::async_trait;
    use serde_json::json;

    /// Transport that must never be reached
    struct NoNetwork;

    #[async_trait]
    impl Transport for NoNetwork {
        async fn get_json(&self, url: &str, _timeout: Duration) -> Result<Value, FetchError> {
            panic!("unexpected request to {}", url);
        }
    }

    fn memory_cache() -> Arc<dyn CacheStore> {
        Arc::new(ManagedCache::new(Arc::new(SharedCache::new(100)), "test", None))
    }

    #[test]
    fn test_blank_token_means_anonymous() {
        let client =
            SuperheroClient::with_transport(Some("  ".to_string()), memory_cache(), NoNetwork);
        assert!(client.is_anonymous());

        let client =
            SuperheroClient::with_transport(Some(" abc ".to_string()), memory_cache(), NoNetwork);
        assert!(!client.is_anonymous());
        assert_eq!(client.api_url("70").unwrap(), format!("{}/abc/70", API_BASE));
    }

    #[test]
    fn test_api_url_without_token_is_a_configuration_error() {
        let client = SuperheroClient::with_transport(None, memory_cache(), NoNetwork);

        assert!(matches!(client.api_url("1"), Err(FetchError::MissingToken)));
    }

    #[tokio::test]
    async fn test_fetch_api_without_token_reports_missing_token() {
        let client = SuperheroClient::with_transport(None, memory_cache(), NoNetwork);

        let result = client.fetch_api("1").await;

        assert!(matches!(result, Err(FetchError::MissingToken)));
    }

    #[test]
    fn test_api_url_joins_paths() {
        let client =
            SuperheroClient::with_transport(Some("t".to_string()), memory_cache(), NoNetwork)
                .with_endpoints(Endpoints {
                    api_base: "http://localhost:1/api/".to_string(),
                    ..Endpoints::default()
                });

        assert_eq!(
            client.api_url("/5/appearance").unwrap(),
            "http://localhost:1/api/t/5/appearance"
        );
    }

    #[test]
    fn test_hero_image_url_uses_configured_base() {
        let client = SuperheroClient::with_transport(None, memory_cache(), NoNetwork)
            .with_endpoints(Endpoints {
                image_base: "https://img.example".to_string(),
                ..Endpoints::default()
            });

        assert_eq!(
            client.hero_image_url(1, "Batman"),
            "https://img.example/1-batman.jpg"
        );
    }

    #[tokio::test]
    async fn test_cached_character_is_served_without_network() {
        let cache = memory_cache();
        cache.set("char_7", json!({"id": "7", "name": "Abraxas"})).unwrap();
        let client = SuperheroClient::with_transport(Some("t".to_string()), cache, NoNetwork);

        let record = client.get_character(7).await.expect("cache hit");

        assert_eq!(record["name"], "Abraxas");
    }

    #[tokio::test]
    async fn test_cached_snapshot_is_served_without_network() {
        let cache = memory_cache();
        cache
            .set_hero_list(vec![json!({"id": "1", "name": "A-Bomb", "appearance": {}})])
            .unwrap();
        let client = SuperheroClient::with_transport(None, cache, NoNetwork);

        let heroes = client.get_hero_list().await;

        assert_eq!(heroes.len(), 1);
        assert_eq!(heroes[0].name, "A-Bomb");
    }

    #[tokio::test]
    async fn test_empty_cached_record_falls_through_to_field_entry() {
        let cache = memory_cache();
        cache.set("char_3", json!({})).unwrap();
        cache
            .set(
                "biography_3",
                json!({"id": "3", "name": "Agent 13", "full-name": "Sharon Carter"}),
            )
            .unwrap();
        let client = SuperheroClient::with_transport(None, cache, NoNetwork);

        let bio = client.get_biography(3).await.expect("field entry");

        assert_eq!(bio.fields.full_name.as_deref(), Some("Sharon Carter"));
    }

    #[test]
    fn test_is_empty_record() {
        assert!(is_empty_record(&json!({})));
        assert!(is_empty_record(&Value::Null));
        assert!(!is_empty_record(&json!({"id": "1"})));
    }
}
