use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{Map, Value};
use tokio::task::JoinSet;
use tracing::debug;

use crate::client::GameDataClient;
use crate::error::Result;
use crate::region::{CountryCode, RES_LOCAL_LANGS};

/// Mapping from zero-based stage index to an optional display name.
///
/// An unresolved name is a normal, displayable state, not an error: the
/// table distinguishes "known to have no name" (`Some(None)`) from "never
/// fetched" (no entry). Ordered by ID so the persisted form stays diffable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTable {
    names: BTreeMap<u32, Option<String>>,
}

impl NameTable {
    pub fn get(&self, id: u32) -> Option<&str> {
        self.names.get(&id).and_then(|name| name.as_deref())
    }

    pub fn contains(&self, id: u32) -> bool {
        self.names.contains_key(&id)
    }

    pub fn insert(&mut self, id: u32, name: Option<String>) {
        self.names.insert(id, name);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.names.keys().copied()
    }

    /// Resolved name, or an "unknown" placeholder for display.
    pub fn display_name(&self, id: u32) -> String {
        match self.get(id) {
            Some(name) => name.to_string(),
            None => format!("unknown enigma stage {id}"),
        }
    }

    /// Tolerant load from the cached JSON object: unparsable keys and
    /// non-string values are skipped, never an error.
    pub fn from_value(value: &Value) -> Self {
        let mut table = Self::default();
        if let Some(object) = value.as_object() {
            for (key, entry) in object {
                let Ok(id) = key.parse::<u32>() else {
                    continue;
                };
                match entry {
                    Value::String(name) => table.insert(id, Some(name.clone())),
                    Value::Null => table.insert(id, None),
                    _ => {}
                }
            }
        }
        table
    }

    /// JSON object keyed by decimal ID, in ascending numeric order.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        for (id, name) in &self.names {
            let entry = match name {
                Some(name) => Value::String(name.clone()),
                None => Value::Null,
            };
            object.insert(id.to_string(), entry);
        }
        Value::Object(object)
    }
}

/// Loads, refreshes and persists the enigma stage name table for one
/// region.
pub struct EnigmaNames {
    client: GameDataClient,
    table: NameTable,
}

/// Outcome of scraping one stage info page.
enum Scraped {
    /// Page or heading missing; leave the ID unrecorded so a later
    /// session can try again.
    Absent,
    /// Heading present; an empty text node records as "known unnamed".
    Name(Option<String>),
}

impl EnigmaNames {
    /// Load whatever table is cached on disk; absent or corrupt cache
    /// yields an empty table.
    pub async fn load(client: GameDataClient) -> Self {
        let mut names = Self {
            client,
            table: NameTable::default(),
        };
        if let Ok(bytes) = tokio::fs::read(names.table_path()).await {
            if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
                names.table = NameTable::from_value(&value);
            }
        }
        names
    }

    pub fn table(&self) -> &NameTable {
        &self.table
    }

    pub fn into_table(self) -> NameTable {
        self.table
    }

    fn table_path(&self) -> PathBuf {
        self.client
            .config()
            .cache_root
            .join("enigma_names")
            .join(format!("{}.json", self.client.country_code().code()))
    }

    /// Language segment of the stage name file: the EN build follows the
    /// configured locale when a dedicated pack exists for it.
    fn lang(&self) -> String {
        let locale = &self.client.config().locale;
        if self.client.country_code() == CountryCode::En
            && RES_LOCAL_LANGS.contains(&locale.as_str())
        {
            locale.clone()
        } else {
            self.client.country_code().code().to_string()
        }
    }

    fn stage_info_url(&self, id: u32) -> String {
        let info_url = &self.client.config().info_url;
        let file = format!("H{id:03}.html");
        // the JP pages sit at the root, every other region gets a segment
        match self.client.country_code() {
            CountryCode::Jp => format!("{info_url}/{file}"),
            cc => format!("{info_url}/{}/{file}", cc.code()),
        }
    }

    /// Bring the table up to date with the stage name list: one concurrent
    /// info-page fetch per ID not already recorded, then persist sorted.
    /// IDs recorded in an earlier session are never re-fetched.
    pub async fn refresh(&mut self) -> Result<()> {
        let file = format!("StageName_RH_{}.csv", self.lang());
        let Some(csv) = self.client.download("resLocal", &file).await else {
            debug!("stage name list unavailable, keeping cached table");
            return Ok(());
        };
        let total = String::from_utf8_lossy(&csv)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count() as u32;

        let mut tasks = JoinSet::new();
        for id in 0..total {
            if self.table.contains(id) {
                continue;
            }
            let client = self.client.clone();
            let url = self.stage_info_url(id);
            tasks.spawn(async move { (id, scrape_stage_name(&client, &url).await) });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Ok((id, Scraped::Name(name))) = joined {
                self.table.insert(id, name);
            }
        }

        self.save().await
    }

    pub async fn save(&self) -> Result<()> {
        let path = self.table_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(&self.table.to_value())?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

async fn scrape_stage_name(client: &GameDataClient, url: &str) -> Scraped {
    let Some(body) = client.get_raw(url).await else {
        return Scraped::Absent;
    };
    let html = String::from_utf8_lossy(&body);
    match extract_heading(&html) {
        Some(text) if text.is_empty() => Scraped::Name(None),
        Some(text) => Scraped::Name(Some(text)),
        None => Scraped::Absent,
    }
}

/// Text of the first `<h2>` element, with nested markup stripped. Absent
/// heading means absent name, not an error.
pub fn extract_heading(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<h2")?;
    let content_start = open + lower[open..].find('>')? + 1;
    let content_end = content_start + lower[content_start..].find("</h2>")?;
    let inner = &html[content_start..content_end];

    let mut text = String::new();
    let mut in_tag = false;
    for ch in inner.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            ch if !in_tag => text.push(ch),
            _ => {}
        }
    }
    Some(text.trim().to_string())
}
