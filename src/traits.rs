//! Traits for storage abstraction and extensibility

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use crate::types::*;
use crate::utils::RecordTables;

/// A record kind the store can hold
///
/// Each kind names the draft it is created from and the patch it is
/// updated with. Identity (`id`, creation timestamp) is never part of
/// either, so it cannot change after creation.
pub trait Entity: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Collection this kind lives in
    const KIND: EntityKind;

    /// Fields supplied when the record is created
    type Draft;

    /// Fields supplied on update; `None` keeps the current value
    type Patch;

    /// Unique identifier within the kind's collection
    fn id(&self) -> &str;

    /// Build the record from a draft once the store has stamped it
    fn from_draft(id: String, created_at: NaiveDateTime, draft: Self::Draft) -> Self;

    /// Shallow-merge a patch into the record
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Dispatch to the matching [`RecordValidator`] method
    fn validate_with(&self, validator: &dyn RecordValidator) -> FarmResult<()>;

    /// The kind's collection inside the in-memory tables
    fn table(tables: &RecordTables) -> &Vec<Self>;

    /// Mutable access to the kind's collection inside the in-memory tables
    fn table_mut(tables: &mut RecordTables) -> &mut Vec<Self>;
}

/// Storage abstraction for farm records
///
/// Collections keep insertion order, and lookups are by id within one kind.
/// The in-memory [`MemoryStorage`](crate::utils::MemoryStorage) is the only
/// backend shipped; a persisted backend would put its single-writer
/// discipline behind these same methods.
pub trait FarmStorage: Send + Sync {
    /// Append a record to the end of its collection
    fn insert<E: Entity>(&mut self, record: &E) -> FarmResult<()>;

    /// Get a record by id
    fn get<E: Entity>(&self, id: &str) -> FarmResult<Option<E>>;

    /// All records of one kind, in insertion order
    fn list<E: Entity>(&self) -> FarmResult<Vec<E>>;

    /// Replace the record with the same id in place; `false` if absent
    fn replace<E: Entity>(&mut self, record: &E) -> FarmResult<bool>;

    /// Remove a record by id, returning it if it was present
    fn delete<E: Entity>(&mut self, id: &str) -> FarmResult<Option<E>>;
}

/// Trait for implementing custom record validation rules
pub trait RecordValidator: Send + Sync {
    fn validate_farm(&self, farm: &Farm) -> FarmResult<()>;

    fn validate_crop(&self, crop: &Crop) -> FarmResult<()>;

    fn validate_task(&self, task: &Task) -> FarmResult<()>;

    fn validate_expense(&self, expense: &Expense) -> FarmResult<()>;

    fn validate_revenue(&self, revenue: &Revenue) -> FarmResult<()>;
}

/// Default validator with the rules every record must satisfy
pub struct DefaultRecordValidator;

impl RecordValidator for DefaultRecordValidator {
    fn validate_farm(&self, farm: &Farm) -> FarmResult<()> {
        if farm.name.trim().is_empty() {
            return Err(FarmError::Validation(
                "Farm name cannot be empty".to_string(),
            ));
        }

        if farm.size < BigDecimal::from(0) {
            return Err(FarmError::Validation(
                "Farm size cannot be negative".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_crop(&self, _crop: &Crop) -> FarmResult<()> {
        // Every crop field is either typed or free text
        Ok(())
    }

    fn validate_task(&self, task: &Task) -> FarmResult<()> {
        if task.title.trim().is_empty() {
            return Err(FarmError::Validation(
                "Task title cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_expense(&self, expense: &Expense) -> FarmResult<()> {
        if expense.amount < BigDecimal::from(0) {
            return Err(FarmError::Validation(
                "Expense amount cannot be negative".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_revenue(&self, revenue: &Revenue) -> FarmResult<()> {
        if revenue.yield_amount < BigDecimal::from(0) {
            return Err(FarmError::Validation(
                "Yield amount cannot be negative".to_string(),
            ));
        }

        if revenue.price_per_unit < BigDecimal::from(0) {
            return Err(FarmError::Validation(
                "Price per unit cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}
