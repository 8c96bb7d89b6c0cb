//! In-memory storage implementation

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

/// The five record collections, each in insertion order
#[derive(Debug, Clone, Default)]
pub struct RecordTables {
    pub farms: Vec<Farm>,
    pub crops: Vec<Crop>,
    pub tasks: Vec<Task>,
    pub expenses: Vec<Expense>,
    pub revenues: Vec<Revenue>,
}

/// In-memory storage; clones share the same tables
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<RecordTables>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with the given tables
    pub fn with_tables(tables: RecordTables) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> FarmResult<()> {
        *self.write()? = RecordTables::default();
        Ok(())
    }

    fn read(&self) -> FarmResult<RwLockReadGuard<'_, RecordTables>> {
        self.tables
            .read()
            .map_err(|_| FarmError::Storage("record tables lock poisoned".to_string()))
    }

    fn write(&self) -> FarmResult<RwLockWriteGuard<'_, RecordTables>> {
        self.tables
            .write()
            .map_err(|_| FarmError::Storage("record tables lock poisoned".to_string()))
    }
}

impl FarmStorage for MemoryStorage {
    fn insert<E: Entity>(&mut self, record: &E) -> FarmResult<()> {
        let mut tables = self.write()?;
        let table = E::table_mut(&mut tables);
        if table.iter().any(|existing| existing.id() == record.id()) {
            return Err(FarmError::Storage(format!(
                "{} with id '{}' already exists",
                E::KIND,
                record.id()
            )));
        }
        table.push(record.clone());
        Ok(())
    }

    fn get<E: Entity>(&self, id: &str) -> FarmResult<Option<E>> {
        let tables = self.read()?;
        Ok(E::table(&tables).iter().find(|r| r.id() == id).cloned())
    }

    fn list<E: Entity>(&self) -> FarmResult<Vec<E>> {
        let tables = self.read()?;
        Ok(E::table(&tables).clone())
    }

    fn replace<E: Entity>(&mut self, record: &E) -> FarmResult<bool> {
        let mut tables = self.write()?;
        match E::table_mut(&mut tables)
            .iter_mut()
            .find(|existing| existing.id() == record.id())
        {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete<E: Entity>(&mut self, id: &str) -> FarmResult<Option<E>> {
        let mut tables = self.write()?;
        let table = E::table_mut(&mut tables);
        Ok(table
            .iter()
            .position(|r| r.id() == id)
            .map(|index| table.remove(index)))
    }
}
