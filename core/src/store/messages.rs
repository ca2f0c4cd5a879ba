// JSON-file message map
//
// One file holds one JSON object keyed by invoice (or action) id. Every
// operation re-reads the file and every mutation rewrites it in full; there
// is no cache and no locking, so concurrent writers race (last one wins).
//
// Entries are carried as raw JSON between read and write. Only the entry
// being changed is re-encoded; every other entry goes back to disk as it
// was read, whether or not it looks like a `MessageRecord`.

use super::file;
use super::record::{Identifier, MessageRecord};
use crate::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Full contents of a backing file. Ordered so the file is written with
/// sorted keys.
pub type MessageMap = BTreeMap<String, MessageRecord>;

/// Entries exactly as they appear in the file.
type RawMap = BTreeMap<String, serde_json::Value>;

/// Which bot mapping a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// invoice id → message
    #[default]
    Invoice,
    /// action id → message
    Action,
}

impl StoreKind {
    /// Default backing file name for this kind.
    pub fn file_name(self) -> &'static str {
        match self {
            StoreKind::Invoice => "messages.json",
            StoreKind::Action => "action_messages.json",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Invoice => write!(f, "invoice"),
            StoreKind::Action => write!(f, "action"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "invoice" | "invoices" => Ok(StoreKind::Invoice),
            "action" | "actions" => Ok(StoreKind::Action),
            other => Err(format!("Unknown store kind: {} (expected invoice or action)", other)),
        }
    }
}

/// Result of reading the backing file.
///
/// Callers that only care about the data use [`LoadOutcome::into_map`],
/// which collapses every non-`Loaded` case to an empty map.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Parsed file; entries that are not message records are left out
    Loaded(MessageMap),
    /// No backing file yet
    Missing,
    /// File exists but is not a JSON object
    Corrupt { reason: String },
    /// File exists but could not be read (permissions, not a regular file)
    Unreadable { reason: String },
}

impl LoadOutcome {
    pub fn into_map(self) -> MessageMap {
        match self {
            LoadOutcome::Loaded(map) => map,
            LoadOutcome::Missing
            | LoadOutcome::Corrupt { .. }
            | LoadOutcome::Unreadable { .. } => MessageMap::new(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, LoadOutcome::Missing)
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadOutcome::Corrupt { .. })
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, LoadOutcome::Unreadable { .. })
    }
}

enum RawLoad {
    Loaded(RawMap),
    Missing,
    Corrupt(String),
    Unreadable(std::io::Error),
}

/// Handle to one backing file.
///
/// Holds nothing but the path; nothing touches disk until an operation runs.
#[derive(Debug, Clone)]
pub struct MessageStore {
    path: PathBuf,
    kind: StoreKind,
}

impl MessageStore {
    /// Store backed by an explicit file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: StoreKind::default(),
        }
    }

    /// Store backed by the default file for `kind` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, kind: StoreKind) -> Self {
        Self {
            path: dir.as_ref().join(kind.file_name()),
            kind,
        }
    }

    /// Label log notices with a different kind (file path is unchanged).
    pub fn with_kind(mut self, kind: StoreKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    /// Read the backing file, telling apart a missing file from a broken one.
    pub fn load(&self) -> LoadOutcome {
        match self.read_raw() {
            RawLoad::Loaded(raw) => LoadOutcome::Loaded(self.records(raw)),
            RawLoad::Missing => LoadOutcome::Missing,
            RawLoad::Corrupt(reason) => LoadOutcome::Corrupt { reason },
            RawLoad::Unreadable(e) => LoadOutcome::Unreadable {
                reason: e.to_string(),
            },
        }
    }

    /// All records; empty if the file is missing, malformed or unreadable.
    pub fn load_all(&self) -> MessageMap {
        self.load().into_map()
    }

    /// Insert or overwrite the record for `id`, stamped with the current
    /// time, and rewrite the file.
    pub fn upsert(
        &self,
        id: &str,
        message_id: impl Into<Identifier>,
        chat_id: impl Into<Identifier>,
    ) -> Result<MessageRecord> {
        let mut raw = self.load_for_update()?;
        let record = MessageRecord::new(message_id, chat_id);
        raw.insert(id.to_string(), serde_json::to_value(&record)?);
        self.save(&raw)?;

        tracing::info!(
            "✅ Saved message_id {} for {} {}",
            record.message_id,
            self.kind,
            id
        );
        Ok(record)
    }

    pub fn get(&self, id: &str) -> Option<MessageRecord> {
        self.load_all().remove(id)
    }

    /// Remove the entry for `id`. Returns whether it existed; the file is
    /// only rewritten when it did.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut raw = self.load_for_update()?;
        if raw.remove(id).is_none() {
            return Ok(false);
        }
        self.save(&raw)?;

        tracing::info!("✅ Removed message data for {} {}", self.kind, id);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.load_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_raw(&self) -> RawLoad {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No message store at {}, starting empty", self.path.display());
                return RawLoad::Missing;
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not read message store {}: {}", self.path.display(), e);
                return RawLoad::Unreadable(e);
            }
        };

        match serde_json::from_slice::<RawMap>(&bytes) {
            Ok(raw) => {
                tracing::debug!(
                    "Loaded message store {} ({} entries)",
                    self.path.display(),
                    raw.len()
                );
                RawLoad::Loaded(raw)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Message store {} is not a JSON object: {} (treating as empty)",
                    self.path.display(),
                    e
                );
                RawLoad::Corrupt(e.to_string())
            }
        }
    }

    /// Entries for a read-modify-write. A missing or malformed file starts
    /// empty; a file that exists but cannot be read is an error so it is
    /// never replaced blind.
    fn load_for_update(&self) -> Result<RawMap> {
        match self.read_raw() {
            RawLoad::Loaded(raw) => Ok(raw),
            RawLoad::Missing | RawLoad::Corrupt(_) => Ok(RawMap::new()),
            RawLoad::Unreadable(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    fn records(&self, raw: RawMap) -> MessageMap {
        raw.into_iter()
            .filter_map(|(id, value)| match serde_json::from_value::<MessageRecord>(value) {
                Ok(record) => Some((id, record)),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Entry {} in {} is not a message record ({}), leaving it untouched",
                        id,
                        self.path.display(),
                        e
                    );
                    None
                }
            })
            .collect()
    }

    fn save(&self, raw: &RawMap) -> Result<()> {
        let contents = serde_json::to_string_pretty(raw)?;
        file::write_atomic(&self.path, contents.as_bytes())?;

        tracing::debug!(
            "Saved message store {} ({} entries)",
            self.path.display(),
            raw.len()
        );
        Ok(())
    }
}
