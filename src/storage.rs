use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::{ContentItem, JournalEntry};

const FAVORITES_FILE: &str = "favorites.json";
const JOURNAL_FILE: &str = "journal.json";
const MARKERS_FILE: &str = "markers.json";

/// Current schema version of each persisted collection
const SCHEMA_VERSION: u32 = 1;

/// Versioned on-disk wrapper around a persisted list. A version we do not
/// recognize degrades to an empty list instead of failing the load.
#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    items: Vec<T>,
}

/// Borrowing mirror of [`Envelope`] for writes
#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    items: &'a [T],
}

/// Small persisted flags and date markers
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Markers {
    #[serde(default)]
    pub onboarding_complete: bool,
    /// Local date (`%Y-%m-%d`) the daily message was last dismissed on
    #[serde(default)]
    pub last_daily_date: Option<String>,
    /// Set after the one-shot new-user notification has been attempted
    #[serde(default)]
    pub visited: bool,
    /// Stable identifier generated on first launch
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Manages favorites, the journal and flag markers across restarts
pub struct Storage {
    pub favorites: Vec<ContentItem>,
    pub journal: Vec<JournalEntry>,
    pub markers: Markers,
    config_dir: PathBuf,
}

impl Storage {
    /// Open storage rooted at `config_dir`, loading whatever is on disk.
    /// Absent or corrupt files become empty defaults; loading never fails.
    pub fn open(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Storage {
            favorites: load_list(&config_dir.join(FAVORITES_FILE)),
            journal: load_list(&config_dir.join(JOURNAL_FILE)),
            markers: load_markers(&config_dir.join(MARKERS_FILE)),
            config_dir,
        }
    }

    /// Add the item to the front of the favorites (marked favorited) if
    /// absent, remove it if present. Returns the new flag value for the id
    /// so the caller can keep its displayed copy in sync.
    pub fn toggle_favorite(&mut self, item: &ContentItem) -> Result<bool> {
        let was_favorite = self.favorites.iter().any(|f| f.id == item.id);
        if was_favorite {
            self.favorites.retain(|f| f.id != item.id);
        } else {
            let mut copy = item.clone();
            copy.is_favorite = true;
            self.favorites.insert(0, copy);
        }
        self.save_favorites()?;
        Ok(!was_favorite)
    }

    /// Prepend an entry, keeping the journal newest-first
    pub fn add_journal_entry(&mut self, entry: JournalEntry) -> Result<()> {
        self.journal.insert(0, entry);
        self.save_journal()
    }

    pub fn set_onboarding_complete(&mut self) -> Result<()> {
        self.markers.onboarding_complete = true;
        self.save_markers()
    }

    pub fn set_last_daily_date(&mut self, date: impl Into<String>) -> Result<()> {
        self.markers.last_daily_date = Some(date.into());
        self.save_markers()
    }

    /// On the very first launch, mint and persist a user identifier and
    /// return it; every later call returns None.
    pub fn first_launch_id(&mut self) -> Option<String> {
        if self.markers.visited {
            return None;
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.markers.visited = true;
        self.markers.user_id = Some(id.clone());
        if let Err(e) = self.save_markers() {
            tracing::warn!(error = %e, "Failed to persist first-launch marker");
        }
        Some(id)
    }

    /// True when the daily message has not been shown on `today` yet
    pub fn daily_message_due(&self, today: &str) -> bool {
        self.markers.last_daily_date.as_deref() != Some(today)
    }

    fn save_favorites(&self) -> Result<()> {
        self.write_list(FAVORITES_FILE, &self.favorites)
    }

    fn save_journal(&self) -> Result<()> {
        self.write_list(JOURNAL_FILE, &self.journal)
    }

    fn save_markers(&self) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(&self.markers)?;
        fs::write(self.config_dir.join(MARKERS_FILE), content)?;
        Ok(())
    }

    fn write_list<T: Serialize>(&self, file: &str, items: &[T]) -> Result<()> {
        self.ensure_dir()?;
        let envelope = EnvelopeRef {
            version: SCHEMA_VERSION,
            items,
        };
        let content = serde_json::to_string_pretty(&envelope)?;
        fs::write(self.config_dir.join(file), content)?;
        Ok(())
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }
}

fn load_list<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str::<Envelope<T>>(&content) {
        Ok(envelope) if envelope.version == SCHEMA_VERSION => envelope.items,
        Ok(envelope) => {
            tracing::warn!(path = %path.display(), version = envelope.version, "Unknown schema version, starting empty");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corrupt stored list, starting empty");
            Vec::new()
        }
    }
}

fn load_markers(path: &Path) -> Markers {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentKind;

    fn item(text: &str, tag: &str) -> ContentItem {
        ContentItem::new(text, ContentKind::Word, tag)
    }

    #[test]
    fn test_toggle_favorite_adds_copy_to_front() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::open(dir.path());

        let first = item("один", "Тишина");
        let second = item("два", "Сила");
        assert!(storage.toggle_favorite(&first).unwrap());
        assert!(storage.toggle_favorite(&second).unwrap());

        assert_eq!(storage.favorites.len(), 2);
        assert_eq!(storage.favorites[0].id, second.id);
        assert!(storage.favorites.iter().all(|f| f.is_favorite));
    }

    #[test]
    fn test_double_toggle_restores_membership() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::open(dir.path());

        let kept = item("остаётся", "Любовь");
        storage.toggle_favorite(&kept).unwrap();
        let before: Vec<String> = storage.favorites.iter().map(|f| f.id.clone()).collect();

        let toggled = item("туда-сюда", "Боль");
        assert!(storage.toggle_favorite(&toggled).unwrap());
        assert!(!storage.toggle_favorite(&toggled).unwrap());

        let after: Vec<String> = storage.favorites.iter().map(|f| f.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_toggle_removes_then_readds_at_front() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::open(dir.path());

        let a = item("a", "t");
        let b = item("b", "t");
        storage.toggle_favorite(&a).unwrap();
        storage.toggle_favorite(&b).unwrap();

        // a is already stored: toggling removes it
        storage.toggle_favorite(&a).unwrap();
        assert!(!storage.favorites.iter().any(|f| f.id == a.id));

        // toggling again re-adds it at the front
        storage.toggle_favorite(&a).unwrap();
        assert_eq!(storage.favorites[0].id, a.id);
    }

    #[test]
    fn test_no_duplicate_ids_after_toggles() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::open(dir.path());

        let a = item("a", "t");
        storage.toggle_favorite(&a).unwrap();
        storage.toggle_favorite(&a).unwrap();
        storage.toggle_favorite(&a).unwrap();
        assert_eq!(
            storage.favorites.iter().filter(|f| f.id == a.id).count(),
            1
        );
    }

    #[test]
    fn test_favorites_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let favorite = item("сохранится", "Тишина");
        {
            let mut storage = Storage::open(dir.path());
            storage.toggle_favorite(&favorite).unwrap();
        }

        let reloaded = Storage::open(dir.path());
        assert_eq!(reloaded.favorites.len(), 1);
        assert_eq!(reloaded.favorites[0].id, favorite.id);
        assert_eq!(reloaded.favorites[0].text, "сохранится");
        assert!(reloaded.favorites[0].is_favorite);
    }

    #[test]
    fn test_corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FAVORITES_FILE), "{not json at all").unwrap();
        fs::write(dir.path().join(JOURNAL_FILE), "42").unwrap();
        fs::write(dir.path().join(MARKERS_FILE), "[]").unwrap();

        let storage = Storage::open(dir.path());
        assert!(storage.favorites.is_empty());
        assert!(storage.journal.is_empty());
        assert!(!storage.markers.onboarding_complete);
    }

    #[test]
    fn test_unknown_schema_version_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(FAVORITES_FILE),
            r#"{"version": 99, "items": [{"bogus": true}]}"#,
        )
        .unwrap();

        let storage = Storage::open(dir.path());
        assert!(storage.favorites.is_empty());
    }

    #[test]
    fn test_journal_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::open(dir.path());

        storage
            .add_journal_entry(JournalEntry::new("первая", None))
            .unwrap();
        storage
            .add_journal_entry(JournalEntry::new("вторая", None))
            .unwrap();

        assert_eq!(storage.journal[0].user_text, "вторая");
        assert_eq!(storage.journal[1].user_text, "первая");

        let reloaded = Storage::open(dir.path());
        assert_eq!(reloaded.journal[0].user_text, "вторая");
    }

    #[test]
    fn test_markers_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let first_id;
        {
            let mut storage = Storage::open(dir.path());
            storage.set_onboarding_complete().unwrap();
            storage.set_last_daily_date("2026-08-27").unwrap();
            first_id = storage.first_launch_id();
            assert!(first_id.is_some());
        }

        let mut reloaded = Storage::open(dir.path());
        assert!(reloaded.markers.onboarding_complete);
        assert!(reloaded.markers.visited);
        assert_eq!(reloaded.markers.user_id, first_id);
        assert!(reloaded.first_launch_id().is_none());
        assert!(!reloaded.daily_message_due("2026-08-27"));
        assert!(reloaded.daily_message_due("2026-08-28"));
    }
}
