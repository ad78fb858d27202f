use crate::error::{Result, TrackerError};
use crate::record::store::{RecordStore, StoredRecord};
use crate::record::types::{EntityName, Snapshot};
use tracing::{debug, info, warn};

/// Everything that could be read back for one entity.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Parsed snapshots, in no particular order.
    pub snapshots: Vec<Snapshot>,
    /// One `CorruptRecord` per record that was skipped.
    pub warnings: Vec<TrackerError>,
}

impl LoadReport {
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Rebuilds an entity's history from its stored records.
/// Invariant: a bad record never hides the rest of the history.
pub struct SnapshotLoader;

impl SnapshotLoader {
    pub fn load_all<S: RecordStore + ?Sized>(store: &S, name: &EntityName) -> Result<LoadReport> {
        let entries = store.records(name)?;
        let mut report = LoadReport::default();
        if entries.is_empty() {
            debug!("no records for {}", name);
            return Ok(report);
        }

        info!("Loading data for {}", name);
        for entry in entries {
            match entry.and_then(|record| decode_record(&record)) {
                Ok(snapshot) => report.snapshots.push(snapshot),
                Err(e) => {
                    warn!("skipping record of {}: {}", name, e);
                    report.warnings.push(e);
                }
            }
        }
        Ok(report)
    }
}

pub fn decode_record(record: &StoredRecord) -> Result<Snapshot> {
    let snapshot: Snapshot =
        serde_json::from_slice(&record.bytes).map_err(|e| TrackerError::CorruptRecord {
            record: record.id.clone(),
            reason: e.to_string(),
        })?;

    // A copied or renamed file would put two points on one capture time.
    if snapshot.record_id() != record.id {
        return Err(TrackerError::CorruptRecord {
            record: record.id.clone(),
            reason: format!("embedded date {} does not match the record name", snapshot.captured_at),
        });
    }
    Ok(snapshot)
}
