use std::path::PathBuf;
use std::time::Duration;

/// Immutable fetcher configuration, injected at client construction.
/// Every URL and timeout decision is a pure function of this snapshot.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Root of the game data repository; `latest.txt` and
    /// `{version}/{pack}/{file}` live under it.
    pub repo_url: String,
    /// Root of the per-stage info pages the enigma names are scraped from.
    pub info_url: String,
    /// Local cache root; game data goes to `game_data/{version}/{pack}/`
    /// and name tables to `enigma_names/`.
    pub cache_root: PathBuf,
    /// UI locale, used only to pick the locale-suffixed resource pack.
    pub locale: String,
    /// Per-request timeout; a timeout reads as "no data", never an error.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            repo_url: "https://raw.githubusercontent.com/fieryhenry/BCData/master".to_string(),
            info_url: "https://ponosgames.com/information/appli/battlecats/stage".to_string(),
            cache_root: PathBuf::from("bc-se-cache"),
            locale: "en".to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}
