use crate::error::{Result, TrackerError};
use crate::record::types::{SkillRecord, Snapshot};
use crate::series::types::{Series, SeriesPoint};
use crate::series::vocab::{Mode, Skill};
use tracing::warn;

/// A series plus the snapshots that could not contribute a point.
#[derive(Debug)]
pub struct ExtractReport {
    pub series: Series,
    /// `MissingField` for snapshots without the field, `CorruptRecord` for
    /// snapshots that repeat an earlier capture time.
    pub warnings: Vec<TrackerError>,
}

pub struct SeriesExtractor;

impl SeriesExtractor {
    /// Projects `metric`/`mode` out of a loaded history.
    ///
    /// Both names are checked against the closed vocabularies before any
    /// snapshot is read. Snapshots lacking the field are skipped with a
    /// warning, as is every snapshot after the first at a given capture time.
    /// Output is strictly ascending by capture time.
    pub fn extract(snapshots: &[Snapshot], metric: &str, mode: &str) -> Result<ExtractReport> {
        let skill: Skill = metric.parse()?;
        let mode: Mode = mode.parse()?;
        Ok(Self::extract_typed(snapshots, skill, mode))
    }

    pub fn extract_typed(snapshots: &[Snapshot], skill: Skill, mode: Mode) -> ExtractReport {
        let mut points = Vec::with_capacity(snapshots.len());
        let mut warnings = Vec::new();

        for snapshot in snapshots {
            match lookup(snapshot, skill).and_then(|record| mode.select(record)) {
                Some(value) => points.push(SeriesPoint {
                    at: snapshot.captured_at,
                    value,
                }),
                None => {
                    let e = TrackerError::MissingField {
                        timestamp: snapshot.captured_at.record_id(),
                        metric: skill.to_string(),
                        mode: mode.to_string(),
                    };
                    warn!("{}", e);
                    warnings.push(e);
                }
            }
        }

        points.sort_by_key(|p| p.at);
        let mut kept: Vec<SeriesPoint> = Vec::with_capacity(points.len());
        for point in points {
            if kept.last().is_some_and(|last| last.at == point.at) {
                let e = TrackerError::CorruptRecord {
                    record: point.at.record_id(),
                    reason: "another snapshot has the same capture time".to_string(),
                };
                warn!("{}", e);
                warnings.push(e);
                continue;
            }
            kept.push(point);
        }

        ExtractReport {
            series: Series {
                skill,
                mode,
                points: kept,
            },
            warnings,
        }
    }
}

fn lookup(snapshot: &Snapshot, skill: Skill) -> Option<&SkillRecord> {
    snapshot.metrics.get(skill.as_str()).or_else(|| {
        skill
            .legacy_keys()
            .iter()
            .find_map(|key| snapshot.metrics.get(*key))
    })
}
