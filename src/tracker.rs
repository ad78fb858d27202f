use tracing::info;

use crate::error::Result;
use crate::lifecycle::EntityManager;
use crate::record::loader::{LoadReport, SnapshotLoader};
use crate::record::store::RecordStore;
use crate::record::types::{AccountType, CaptureTime, EntityName, Snapshot};
use crate::series::extractor::{ExtractReport, SeriesExtractor};
use crate::series::vocab::{Mode, Skill};
use crate::services::StatsFetcher;

/// A stored capture and the account it was filed under.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub entity: EntityName,
    pub snapshot: Snapshot,
}

/// Ties a record store to a stats source: capture writes, view reads.
pub struct Tracker<S: RecordStore, F: StatsFetcher> {
    store: S,
    fetcher: F,
}

impl<S: RecordStore, F: StatsFetcher> Tracker<S, F> {
    pub fn new(store: S, fetcher: F) -> Self {
        Self { store, fetcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn capture(&mut self, name: &str, account: AccountType) -> anyhow::Result<Capture> {
        self.capture_at(name, account, CaptureTime::now()).await
    }

    pub async fn capture_at(
        &mut self,
        name: &str,
        account: AccountType,
        at: CaptureTime,
    ) -> anyhow::Result<Capture> {
        let name = EntityName::parse(name)?;
        let metrics = self.fetcher.fetch_stats(&name, account).await?;
        let snapshot = Snapshot::new(at, metrics);

        info!("Recording stats of {} as of {}", name, snapshot.captured_at);
        self.store.append_snapshot(&name, &snapshot)?;
        Ok(Capture {
            entity: name,
            snapshot,
        })
    }

    pub fn history(&self, name: &str) -> Result<LoadReport> {
        let name = EntityName::parse(name)?;
        SnapshotLoader::load_all(&self.store, &name)
    }

    /// Loads `name` and projects one skill/mode out of it. Load and extract
    /// warnings are merged into the report.
    pub fn view(&self, name: &str, metric: &str, mode: &str) -> Result<ExtractReport> {
        // Vocabulary first so a typo never touches the disk.
        let skill: Skill = metric.parse()?;
        let mode: Mode = mode.parse()?;
        let name = EntityName::parse(name)?;

        let loaded = SnapshotLoader::load_all(&self.store, &name)?;
        let mut report = SeriesExtractor::extract_typed(&loaded.snapshots, skill, mode);
        let mut warnings = loaded.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        Ok(report)
    }

    pub fn lifecycle(&mut self) -> EntityManager<'_, S> {
        EntityManager::new(&mut self.store)
    }
}
