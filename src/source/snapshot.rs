use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::{Event, Meet};

const MEET_FILE: &str = "meet.json";

/// Read-only view of a snapshot tree on disk.
///
/// Layout mirrors the upstream document store:
/// `<root>/years/<year>/meets/<meet>/meet.json` holds meet metadata and
/// `<root>/years/<year>/meets/<meet>/<gender>.json` holds that partition's
/// events as a JSON array.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    root: PathBuf,
}

impl SnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn meets_dir(&self, year: i32) -> PathBuf {
        self.root.join("years").join(year.to_string()).join("meets")
    }

    fn meet_dir(&self, year: i32, meet: &str) -> PathBuf {
        self.meets_dir(year).join(meet)
    }

    /// All meets recorded for a year, sorted by key. A year with no
    /// directory has no meets.
    pub async fn list_meets(&self, year: i32) -> Result<Vec<Meet>> {
        let dir = self.meets_dir(year);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to list meets in {}", dir.display()))
            }
        };

        let mut meets = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list meets in {}", dir.display()))?
        {
            let path = entry.path().join(MEET_FILE);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                meets.push(read_json::<Meet>(&path).await?);
            }
        }
        meets.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(meets)
    }

    /// Meet metadata without any events loaded
    pub async fn load_meet(&self, year: i32, meet: &str) -> Result<Meet> {
        let path = self.meet_dir(year, meet).join(MEET_FILE);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            anyhow::bail!("Meet not found for meet='{}' and year='{}'", meet, year);
        }
        read_json(&path).await
    }

    /// Gender partitions present for a meet, sorted
    pub async fn list_genders(&self, year: i32, meet: &str) -> Result<Vec<String>> {
        let dir = self.meet_dir(year, meet);
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to list partitions in {}", dir.display()))?;

        let mut genders = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            let is_meet_file = path.file_name().is_some_and(|name| name == MEET_FILE);
            if is_json && !is_meet_file {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    genders.push(stem.to_string());
                }
            }
        }
        genders.sort();
        Ok(genders)
    }

    /// Events of one gender partition. A partition with no file yet has no
    /// events.
    pub async fn load_events(&self, year: i32, meet: &str, gender: &str) -> Result<Vec<Event>> {
        let path = self
            .meet_dir(year, meet)
            .join(format!("{}.json", normalize_gender(gender)));
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "partition file missing, no events");
            return Ok(Vec::new());
        }
        let events: Vec<Event> = read_json(&path).await?;
        tracing::info!(meet, gender, events = events.len(), "loaded partition");
        Ok(events)
    }

    /// Load a meet together with the requested gender partitions.
    ///
    /// Partitions are read concurrently, but the meet is only returned once
    /// every partition has loaded; any failure fails the whole snapshot.
    pub async fn load_snapshot(&self, year: i32, meet: &str, genders: &[String]) -> Result<Meet> {
        let mut snapshot = self.load_meet(year, meet).await?;

        let mut futures = FuturesUnordered::new();
        for gender in genders {
            let gender = normalize_gender(gender);
            futures.push(async move {
                let result = self.load_events(year, meet, &gender).await;
                (gender, result)
            });
        }

        let mut partitions = BTreeMap::new();
        while let Some((gender, result)) = futures.next().await {
            let events = result
                .with_context(|| format!("Failed to load {} events for {}", gender, meet))?;
            partitions.insert(gender, events);
        }

        snapshot.partitions = partitions;
        Ok(snapshot)
    }
}

pub fn normalize_gender(gender: &str) -> String {
    gender.trim().to_ascii_lowercase()
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}: invalid JSON", path.display()))
}
