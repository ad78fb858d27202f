use crate::error::TrackerError;
use crate::record::store::RecordStore;
use crate::record::types::EntityName;
use tracing::info;

/// Name-level operations over the tracked accounts. Every failure comes back
/// as a message fit for the terminal.
pub struct EntityManager<'a, S: RecordStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: RecordStore + ?Sized> EntityManager<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub fn show(&self) -> Result<Vec<EntityName>, String> {
        self.store
            .list_entities()
            .map(|names| names.into_iter().collect())
            .map_err(|e| describe(&e))
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<String, String> {
        let old = EntityName::parse(old).map_err(|e| describe(&e))?;
        let new = EntityName::parse(new).map_err(|e| describe(&e))?;
        self.store
            .rename_entity(&old, &new)
            .map_err(|e| describe(&e))?;
        info!("renamed {} to {}", old, new);
        Ok(format!("Renamed {old} to {new}"))
    }

    pub fn delete(&mut self, name: &str) -> Result<String, String> {
        let name = EntityName::parse(name).map_err(|e| describe(&e))?;
        self.store.delete_entity(&name).map_err(|e| describe(&e))?;
        info!("deleted {}", name);
        Ok(format!("Deleted all records of {name}"))
    }
}

/// Terminal wording for store errors.
pub fn describe(err: &TrackerError) -> String {
    match err {
        TrackerError::UnknownEntity(name) => format!("{name} is not currently being tracked"),
        TrackerError::NameCollision(name) => {
            format!("{name} is already being tracked; delete or rename it first")
        }
        TrackerError::DuplicateTimestamp { entity, record } => {
            format!("{entity} already has a record for {record}; try again in a second")
        }
        TrackerError::InvalidEntityName(raw) => format!("{raw:?} is not a valid account name"),
        other => format!("Error: {other}"),
    }
}
