use std::path::PathBuf;

use bytes::Bytes;
use tokio::task::JoinSet;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::Result;
use crate::region::{CountryCode, RES_LOCAL_LANGS};

/// Download attempts per file. The budget bounds the "cache still missing
/// after a succeeded-looking fetch" loop, not transient network failures:
/// a failed GET simply yields an absent result for that attempt.
const DOWNLOAD_RETRIES: u32 = 2;

const SHARED_RESOURCE_PACK: &str = "resLocal";

/// Fetches named files from one published version of the remote game data
/// repository, caching them under
/// `{cache_root}/game_data/{version}/{pack}/{file}`.
///
/// The version is resolved once at construction. When the repository has
/// not published a version for the region yet, every download degrades to
/// an absent result instead of erroring.
#[derive(Debug, Clone)]
pub struct GameDataClient {
    http: reqwest::Client,
    config: FetchConfig,
    cc: CountryCode,
    version: Option<String>,
}

impl GameDataClient {
    pub async fn new(config: FetchConfig, cc: CountryCode) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let mut client = Self {
            http,
            config,
            cc,
            version: None,
        };
        client.version = client.resolve_version().await;
        Ok(client)
    }

    /// Client pinned to an already-known version (or none), performing no
    /// version resolution. With no version every download is a cache-only
    /// lookup.
    pub fn offline(config: FetchConfig, cc: CountryCode, version: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            cc,
            version,
        })
    }

    pub fn country_code(&self) -> CountryCode {
        self.cc
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// The version tag downloads are pinned to, if the repository has one
    /// for this region.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    async fn resolve_version(&self) -> Option<String> {
        let url = format!("{}/latest.txt", self.config.repo_url);
        let body = match self.get_raw(&url).await {
            Some(body) => body,
            None => {
                debug!("version list unavailable at {url}");
                return None;
            }
        };
        let text = String::from_utf8_lossy(&body).into_owned();
        let versions: Vec<&str> = text.lines().collect();
        Self::latest_version(&versions, self.cc)
    }

    fn latest_version(versions: &[&str], cc: CountryCode) -> Option<String> {
        versions
            .get(cc.version_index())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// The shared resource pack is split per language for the EN build;
    /// other packs and regions pass through unchanged. Applied at every
    /// fetch entry point so cache keys and URLs always agree.
    pub fn pack_name(&self, pack: &str) -> String {
        if pack != SHARED_RESOURCE_PACK || self.cc != CountryCode::En {
            return pack.to_string();
        }
        if RES_LOCAL_LANGS.contains(&self.config.locale.as_str()) {
            return format!("{pack}_{}", self.config.locale);
        }
        pack.to_string()
    }

    /// Cache location for `(version, pack, file)`; pure and deterministic,
    /// so concurrent downloads of distinct files never share a path.
    pub fn cache_path(&self, pack: &str, file: &str) -> Option<PathBuf> {
        let version = self.version.as_ref()?;
        Some(
            self.config
                .cache_root
                .join("game_data")
                .join(version)
                .join(self.pack_name(pack))
                .join(file),
        )
    }

    pub async fn is_downloaded(&self, pack: &str, file: &str) -> bool {
        match self.cache_path(pack, file) {
            Some(path) => tokio::fs::metadata(path).await.is_ok(),
            None => false,
        }
    }

    async fn read_cached(&self, pack: &str, file: &str) -> Option<Bytes> {
        let path = self.cache_path(pack, file)?;
        match tokio::fs::read(path).await {
            Ok(bytes) => Some(Bytes::from(bytes)),
            Err(_) => None,
        }
    }

    /// One GET with the configured timeout. Any non-success status,
    /// timeout or transport error reads as "no data".
    pub async fn get_raw(&self, url: &str) -> Option<Bytes> {
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!("request to {url} failed: {err}");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("request to {url} returned {}", response.status());
            return None;
        }
        response.bytes().await.ok()
    }

    /// Fetch one file and persist it to the cache, returning the payload.
    async fn fetch_and_store(&self, pack: &str, file: &str) -> Option<Bytes> {
        let version = self.version.as_deref()?;
        let url = format!("{}/{version}/{pack}/{file}", self.config.repo_url);
        debug!("downloading {pack}/{file} from version {version}");
        let bytes = self.get_raw(&url).await?;
        let path = self.cache_path(pack, file)?;
        if let Some(parent) = path.parent() {
            if tokio::fs::create_dir_all(parent).await.is_err() {
                return None;
            }
        }
        if let Err(err) = tokio::fs::write(&path, &bytes).await {
            debug!("failed to persist {}: {err}", path.display());
            return None;
        }
        Some(bytes)
    }

    /// Cache-or-fetch for one file. The retry budget is an explicit
    /// counter: each pass re-checks the cache first, and the loop gives up
    /// once the budget is spent.
    pub async fn download(&self, pack: &str, file: &str) -> Option<Bytes> {
        let pack = self.pack_name(pack);
        let mut retries = DOWNLOAD_RETRIES;
        loop {
            retries -= 1;
            if let Some(bytes) = self.read_cached(&pack, file).await {
                debug!("cache hit for {pack}/{file}");
                return Some(bytes);
            }
            if retries == 0 {
                return None;
            }
            if self.version.is_none() {
                return None;
            }
            if let Some(bytes) = self.fetch_and_store(&pack, file).await {
                return Some(bytes);
            }
        }
    }

    /// Scatter/gather batch fetch: dispatch one task per file, join all,
    /// then reassemble results from the cache in the caller's order.
    /// Completion order of the tasks is arbitrary and irrelevant; a file
    /// still absent after the concurrent phase stays absent.
    pub async fn download_all(
        &self,
        pack: &str,
        files: &[String],
    ) -> Vec<Option<(String, Bytes)>> {
        let pack = self.pack_name(pack);
        let mut tasks = JoinSet::new();
        for file in files {
            let client = self.clone();
            let pack = pack.clone();
            let file = file.clone();
            tasks.spawn(async move {
                client.download(&pack, &file).await;
            });
        }
        while tasks.join_next().await.is_some() {}

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            let entry = self
                .read_cached(&pack, file)
                .await
                .map(|bytes| (file.clone(), bytes));
            results.push(entry);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_version_is_positional_per_region() {
        let versions = vec!["13.4.0en", "13.5.0jp", "13.3.0kr"];
        assert_eq!(
            GameDataClient::latest_version(&versions, CountryCode::En),
            Some("13.4.0en".to_string())
        );
        assert_eq!(
            GameDataClient::latest_version(&versions, CountryCode::Kr),
            Some("13.3.0kr".to_string())
        );
        // the list has no fourth entry, so TW is unavailable
        assert_eq!(
            GameDataClient::latest_version(&versions, CountryCode::Tw),
            None
        );
    }

    #[test]
    fn blank_version_entry_is_unavailable() {
        let versions = vec!["13.4.0en", "  "];
        assert_eq!(
            GameDataClient::latest_version(&versions, CountryCode::Jp),
            None
        );
    }
}
