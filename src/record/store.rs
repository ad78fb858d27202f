use crate::error::{Result, TrackerError};
use crate::record::types::{EntityName, Snapshot, DATE_KEY};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const RECORD_EXTENSION: &str = "json";

/// A persisted record as the backend holds it, before parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// Sanitized capture timestamp, e.g. `2020-04-27_14-30-05`.
    pub id: String,
    pub bytes: Vec<u8>,
}

/// Per-record read outcome. A record that cannot be read at all surfaces as
/// `CorruptRecord` without failing its siblings.
pub type RecordEntry = Result<StoredRecord>;

/// Append-only persistence of snapshots, keyed by entity.
pub trait RecordStore {
    fn ensure_entity(&mut self, name: &EntityName) -> Result<()>;
    fn append_snapshot(&mut self, name: &EntityName, snapshot: &Snapshot) -> Result<()>;
    fn list_entities(&self) -> Result<BTreeSet<EntityName>>;
    fn rename_entity(&mut self, old: &EntityName, new: &EntityName) -> Result<()>;
    fn delete_entity(&mut self, name: &EntityName) -> Result<()>;
    /// All records of an entity in no particular order. Unknown entity -> empty.
    fn records(&self, name: &EntityName) -> Result<Vec<RecordEntry>>;
}

/// Serializes a snapshot, refusing metrics that would collide with the
/// reserved `date` key and make the record unreadable.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>> {
    if snapshot.metrics.contains_key(DATE_KEY) {
        return Err(TrackerError::ReservedMetricName(DATE_KEY.to_string()));
    }
    serde_json::to_vec_pretty(snapshot).map_err(|e| TrackerError::Serialization(e.to_string()))
}

/// Directory-per-entity backend: `<root>/<entity>/<record id>.json`.
pub struct FileRecordStore {
    root: PathBuf,
}

impl FileRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entity_dir(&self, name: &EntityName) -> PathBuf {
        self.root.join(name.as_str())
    }

    fn record_path(&self, name: &EntityName, id: &str) -> PathBuf {
        self.entity_dir(name).join(format!("{id}.{RECORD_EXTENSION}"))
    }
}

impl RecordStore for FileRecordStore {
    fn ensure_entity(&mut self, name: &EntityName) -> Result<()> {
        fs::create_dir_all(self.entity_dir(name))?;
        Ok(())
    }

    fn append_snapshot(&mut self, name: &EntityName, snapshot: &Snapshot) -> Result<()> {
        let bytes = encode_snapshot(snapshot)?;
        self.ensure_entity(name)?;
        let id = snapshot.record_id();
        let path = self.record_path(name, &id);

        // create_new never clobbers an existing capture of the same second.
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(TrackerError::DuplicateTimestamp {
                    entity: name.to_string(),
                    record: id,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let written = file.write_all(&bytes).and_then(|()| file.sync_all());
        drop(file);
        if let Err(e) = written {
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }
        debug!("wrote {}", path.display());
        Ok(())
    }

    fn list_entities(&self) -> Result<BTreeSet<EntityName>> {
        let mut names = BTreeSet::new();
        if !self.root.is_dir() {
            return Ok(names);
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let raw = entry.file_name();
            match raw.to_str().map(|s| (s, EntityName::parse(s))) {
                Some((s, Ok(name))) if name.as_str() == s => {
                    names.insert(name);
                }
                // e.g. a mixed-case folder left by an older rename
                Some((s, Ok(_))) => {
                    warn!("ignoring directory {:?}: account folders must be lower-case", s)
                }
                _ => debug!("ignoring directory {:?} in records root", raw),
            }
        }
        Ok(names)
    }

    fn rename_entity(&mut self, old: &EntityName, new: &EntityName) -> Result<()> {
        let from = self.entity_dir(old);
        let to = self.entity_dir(new);
        if !from.is_dir() {
            return Err(TrackerError::UnknownEntity(old.to_string()));
        }
        if to.exists() {
            return Err(TrackerError::NameCollision(new.to_string()));
        }
        fs::rename(from, to)?;
        Ok(())
    }

    fn delete_entity(&mut self, name: &EntityName) -> Result<()> {
        let dir = self.entity_dir(name);
        if !dir.is_dir() {
            return Err(TrackerError::UnknownEntity(name.to_string()));
        }
        fs::remove_dir_all(dir)?;
        Ok(())
    }

    fn records(&self, name: &EntityName) -> Result<Vec<RecordEntry>> {
        let dir = self.entity_dir(name);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                debug!("skipping non-record file {}", path.display());
                continue;
            }
            let id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let entry = fs::read(&path)
                .map(|bytes| StoredRecord { id: id.clone(), bytes })
                .map_err(|e| TrackerError::CorruptRecord {
                    record: id.clone(),
                    reason: e.to_string(),
                });
            out.push(entry);
        }
        Ok(out)
    }
}

/// Volatile backend with the same contract as the directory layout.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    entities: BTreeMap<EntityName, BTreeMap<String, Vec<u8>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw bytes under an id, bypassing serialization.
    pub fn insert_raw(&mut self, name: &EntityName, id: &str, bytes: Vec<u8>) {
        self.entities
            .entry(name.clone())
            .or_default()
            .insert(id.to_string(), bytes);
    }
}

impl RecordStore for InMemoryRecordStore {
    fn ensure_entity(&mut self, name: &EntityName) -> Result<()> {
        self.entities.entry(name.clone()).or_default();
        Ok(())
    }

    fn append_snapshot(&mut self, name: &EntityName, snapshot: &Snapshot) -> Result<()> {
        let id = snapshot.record_id();
        let bytes = encode_snapshot(snapshot)?;
        let records = self.entities.entry(name.clone()).or_default();
        if records.contains_key(&id) {
            return Err(TrackerError::DuplicateTimestamp {
                entity: name.to_string(),
                record: id,
            });
        }
        records.insert(id, bytes);
        Ok(())
    }

    fn list_entities(&self) -> Result<BTreeSet<EntityName>> {
        Ok(self.entities.keys().cloned().collect())
    }

    fn rename_entity(&mut self, old: &EntityName, new: &EntityName) -> Result<()> {
        if !self.entities.contains_key(old) {
            return Err(TrackerError::UnknownEntity(old.to_string()));
        }
        if self.entities.contains_key(new) {
            return Err(TrackerError::NameCollision(new.to_string()));
        }
        if let Some(records) = self.entities.remove(old) {
            self.entities.insert(new.clone(), records);
        }
        Ok(())
    }

    fn delete_entity(&mut self, name: &EntityName) -> Result<()> {
        self.entities
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| TrackerError::UnknownEntity(name.to_string()))
    }

    fn records(&self, name: &EntityName) -> Result<Vec<RecordEntry>> {
        Ok(self
            .entities
            .get(name)
            .map(|records| {
                records
                    .iter()
                    .map(|(id, bytes)| {
                        Ok(StoredRecord {
                            id: id.clone(),
                            bytes: bytes.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
