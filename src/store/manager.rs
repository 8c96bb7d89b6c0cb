//! Main farm manager that coordinates records, filtering, and reports

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::DashboardConfig;
use crate::filter::{FilterEngine, FilterQuery, Filterable};
use crate::report::{ProfitLossSummary, ReportBuilder, ReportScope};
use crate::store::records::{CropPatch, RevenueDraft, TaskPatch};
use crate::traits::*;
use crate::types::*;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_farms: usize,
    pub total_crops: usize,
    /// Tasks whose status is anything but Completed
    pub pending_tasks: usize,
    /// All-time expense total
    pub total_expenses: BigDecimal,
}

/// Yield and sale price of a harvested crop
#[derive(Debug, Clone, PartialEq)]
pub struct Harvest {
    pub yield_amount: BigDecimal,
    pub yield_unit: String,
    pub price_per_unit: BigDecimal,
    pub harvest_date: NaiveDate,
}

/// Entity store that owns all record mutation
///
/// Mutations on an id that doesn't exist return `Ok(None)`; the
/// `*_required` variants turn that into [`FarmError::NotFound`].
pub struct FarmManager<S: FarmStorage> {
    storage: S,
    validator: Box<dyn RecordValidator>,
    config: DashboardConfig,
}

impl<S: FarmStorage> FarmManager<S> {
    /// Create a new manager with the given storage backend
    pub fn new(storage: S) -> Self {
        Self::with_validator(storage, Box::new(DefaultRecordValidator))
    }

    /// Create a new manager with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn RecordValidator>) -> Self {
        Self {
            storage,
            validator,
            config: DashboardConfig::default(),
        }
    }

    /// Replace the dashboard configuration
    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Stamp a draft with a fresh id and creation time and append it
    pub fn add<E: Entity>(&mut self, draft: E::Draft) -> FarmResult<E> {
        let now = chrono::Utc::now().naive_utc();
        self.add_at(draft, now)
    }

    /// Same as [`add`](Self::add) with an explicit creation time
    pub fn add_at<E: Entity>(&mut self, draft: E::Draft, created_at: NaiveDateTime) -> FarmResult<E> {
        let record = E::from_draft(Uuid::new_v4().to_string(), created_at, draft);
        record.validate_with(self.validator.as_ref())?;

        self.storage.insert(&record)?;
        info!(kind = %E::KIND, id = record.id(), "record added");

        Ok(record)
    }

    /// Get a record by id
    pub fn get<E: Entity>(&self, id: &str) -> FarmResult<Option<E>> {
        self.storage.get(id)
    }

    /// Get a record by id, returning an error if not found
    pub fn get_required<E: Entity>(&self, id: &str) -> FarmResult<E> {
        self.get(id)?.ok_or_else(|| not_found::<E>(id))
    }

    /// All records of one kind, in insertion order
    pub fn list<E: Entity>(&self) -> FarmResult<Vec<E>> {
        self.storage.list()
    }

    /// Merge a patch into a record, keeping its position
    pub fn update<E: Entity>(&mut self, id: &str, patch: E::Patch) -> FarmResult<Option<E>> {
        let Some(mut record) = self.storage.get::<E>(id)? else {
            warn!(kind = %E::KIND, id, "update skipped: no such record");
            return Ok(None);
        };

        record.apply_patch(patch);
        record.validate_with(self.validator.as_ref())?;

        if !self.storage.replace(&record)? {
            warn!(kind = %E::KIND, id, "update lost: record removed concurrently");
            return Ok(None);
        }
        debug!(kind = %E::KIND, id, "record updated");

        Ok(Some(record))
    }

    /// Merge a patch into a record, returning an error if not found
    pub fn update_required<E: Entity>(&mut self, id: &str, patch: E::Patch) -> FarmResult<E> {
        self.update(id, patch)?.ok_or_else(|| not_found::<E>(id))
    }

    /// Remove a record; dependents are left in place
    pub fn remove<E: Entity>(&mut self, id: &str) -> FarmResult<Option<E>> {
        let removed = self.storage.delete::<E>(id)?;
        match &removed {
            Some(_) => info!(kind = %E::KIND, id, "record removed"),
            None => warn!(kind = %E::KIND, id, "remove skipped: no such record"),
        }
        Ok(removed)
    }

    /// Remove a record, returning an error if not found
    pub fn remove_required<E: Entity>(&mut self, id: &str) -> FarmResult<E> {
        self.remove(id)?.ok_or_else(|| not_found::<E>(id))
    }

    /// Flip a task between Completed and Not Started
    ///
    /// Any status other than Completed moves to Completed.
    pub fn toggle_task_completion(&mut self, id: &str) -> FarmResult<Option<Task>> {
        let Some(task) = self.storage.get::<Task>(id)? else {
            warn!(id, "toggle skipped: no such task");
            return Ok(None);
        };

        let status = if task.is_completed() {
            TaskStatus::NotStarted
        } else {
            TaskStatus::Completed
        };

        self.update::<Task>(
            id,
            TaskPatch {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    /// Turn a crop's harvest into a revenue record and mark the crop harvested
    ///
    /// The crop change runs through [`update`](Self::update), so the configured
    /// validator sees it. If the crop cannot be marked, the new revenue is
    /// removed again and nothing changes.
    pub fn record_harvest(&mut self, crop_id: &str, harvest: Harvest) -> FarmResult<Option<Revenue>> {
        let Some(crop) = self.storage.get::<Crop>(crop_id)? else {
            warn!(crop_id, "harvest skipped: no such crop");
            return Ok(None);
        };

        let revenue = self.add::<Revenue>(RevenueDraft {
            farm_id: crop.farm_id,
            crop_type: crop.crop_type,
            yield_amount: harvest.yield_amount,
            yield_unit: harvest.yield_unit,
            price_per_unit: harvest.price_per_unit,
            harvest_date: harvest.harvest_date,
        })?;

        let marked = self.update::<Crop>(
            crop_id,
            CropPatch {
                status: Some(CropStatus::Harvested),
                ..Default::default()
            },
        );
        match marked {
            Ok(Some(_)) => {
                info!(crop_id, revenue_id = %revenue.id, total = %revenue.total_revenue, "harvest recorded");
                Ok(Some(revenue))
            }
            Ok(None) => {
                self.storage.delete::<Revenue>(&revenue.id)?;
                warn!(crop_id, "harvest rolled back: crop removed");
                Ok(None)
            }
            Err(e) => {
                self.storage.delete::<Revenue>(&revenue.id)?;
                warn!(crop_id, error = %e, "harvest rolled back: crop rejected");
                Err(e)
            }
        }
    }

    /// Search, filter, and sort one kind of record
    pub fn filter<E: Entity + Filterable>(&self, query: &FilterQuery) -> FarmResult<Vec<E>> {
        let farms = self.list::<Farm>()?;
        let records = self.list::<E>()?;
        let engine = FilterEngine::new(&farms, &self.config.unknown_farm_label);
        Ok(engine.filter_and_sort(&records, query))
    }

    /// Snapshot the current records for reporting
    pub fn reports(&self) -> FarmResult<ReportBuilder> {
        Ok(ReportBuilder::new(
            self.list()?,
            self.list()?,
            self.list()?,
            self.config.clone(),
        ))
    }

    /// Profit/loss for a date range, optionally narrowed to one farm
    pub fn profit_loss(&self, scope: &ReportScope) -> FarmResult<ProfitLossSummary> {
        Ok(self.reports()?.profit_loss(scope))
    }

    /// Headline dashboard numbers
    pub fn dashboard_stats(&self) -> FarmResult<DashboardStats> {
        let tasks = self.list::<Task>()?;
        let expenses = self.list::<Expense>()?;

        Ok(DashboardStats {
            total_farms: self.list::<Farm>()?.len(),
            total_crops: self.list::<Crop>()?.len(),
            pending_tasks: tasks.iter().filter(|t| !t.is_completed()).count(),
            total_expenses: expenses.iter().map(|e| &e.amount).sum(),
        })
    }

    /// The first few tasks in insertion order
    pub fn recent_tasks(&self) -> FarmResult<Vec<Task>> {
        let mut tasks = self.list::<Task>()?;
        tasks.truncate(self.config.recent_task_count);
        Ok(tasks)
    }
}

fn not_found<E: Entity>(id: &str) -> FarmError {
    FarmError::NotFound {
        kind: E::KIND,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::records::*;
    use crate::utils::memory_storage::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manager() -> FarmManager<MemoryStorage> {
        FarmManager::new(MemoryStorage::new())
    }

    #[test]
    fn test_manager_basic_operations() {
        let mut manager = manager();

        let farm: Farm = manager
            .add(FarmDraft::new("North Field", "Valley District", BigDecimal::from(50), SizeUnit::Acres))
            .unwrap();
        assert!(!farm.id.is_empty());

        let updated: Farm = manager
            .update(
                &farm.id,
                FarmPatch {
                    name: Some("North Field East".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, farm.id);
        assert_eq!(updated.created_at, farm.created_at);
        assert_eq!(updated.location, "Valley District");

        let removed: Option<Farm> = manager.remove(&farm.id).unwrap();
        assert!(removed.is_some());
        assert!(manager.list::<Farm>().unwrap().is_empty());
    }

    #[test]
    fn test_missing_ids_are_reported_not_raised() {
        let mut manager = manager();

        assert!(manager
            .update::<Expense>("nope", ExpensePatch::default())
            .unwrap()
            .is_none());
        assert!(manager.remove::<Crop>("nope").unwrap().is_none());
        assert!(manager.toggle_task_completion("nope").unwrap().is_none());

        let err = manager.remove_required::<Task>("nope").unwrap_err();
        assert!(matches!(err, FarmError::NotFound { kind: EntityKind::Task, .. }));
    }

    #[test]
    fn test_invalid_records_are_rejected() {
        let mut manager = manager();
        let result = manager.add::<Farm>(FarmDraft::new("  ", "", BigDecimal::from(1), SizeUnit::Acres));
        assert!(matches!(result, Err(FarmError::Validation(_))));

        let expense: Expense = manager
            .add(ExpenseDraft::new(
                "1",
                BigDecimal::from(10),
                ExpenseCategory::Fuel,
                "Diesel",
                date(2024, 3, 1),
            ))
            .unwrap();
        let result = manager.update::<Expense>(
            &expense.id,
            ExpensePatch {
                amount: Some(BigDecimal::from(-5)),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(
            manager.get_required::<Expense>(&expense.id).unwrap().amount,
            BigDecimal::from(10)
        );
    }

    #[test]
    fn test_toggle_task_completion_moves_status() {
        let mut manager = manager();
        let task: Task = manager
            .add(TaskDraft::new("1", "Water crops", date(2024, 3, 1)).status(TaskStatus::InProgress))
            .unwrap();

        let done = manager.toggle_task_completion(&task.id).unwrap().unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.is_completed());

        let reopened = manager.toggle_task_completion(&task.id).unwrap().unwrap();
        assert_eq!(reopened.status, TaskStatus::NotStarted);
        assert!(!reopened.is_completed());
    }

    #[test]
    fn test_record_harvest_creates_revenue() {
        let mut manager = manager();
        let crop: Crop = manager
            .add(CropDraft::new(
                "1",
                CropType::Corn,
                "Sweet Corn",
                date(2024, 4, 1),
                date(2024, 7, 1),
            ))
            .unwrap();

        let revenue = manager
            .record_harvest(
                &crop.id,
                Harvest {
                    yield_amount: BigDecimal::from(120),
                    yield_unit: "bushels".to_string(),
                    price_per_unit: BigDecimal::from(5),
                    harvest_date: date(2024, 7, 3),
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(revenue.farm_id, "1");
        assert_eq!(revenue.crop_type, CropType::Corn);
        assert_eq!(revenue.total_revenue, BigDecimal::from(600));
        assert_eq!(
            manager.get_required::<Crop>(&crop.id).unwrap().status,
            CropStatus::Harvested
        );
    }

    struct NoHarvestValidator;

    impl RecordValidator for NoHarvestValidator {
        fn validate_farm(&self, farm: &Farm) -> FarmResult<()> {
            DefaultRecordValidator.validate_farm(farm)
        }

        fn validate_crop(&self, crop: &Crop) -> FarmResult<()> {
            if crop.status == CropStatus::Harvested {
                return Err(FarmError::Validation("harvests are closed".to_string()));
            }
            Ok(())
        }

        fn validate_task(&self, task: &Task) -> FarmResult<()> {
            DefaultRecordValidator.validate_task(task)
        }

        fn validate_expense(&self, expense: &Expense) -> FarmResult<()> {
            DefaultRecordValidator.validate_expense(expense)
        }

        fn validate_revenue(&self, revenue: &Revenue) -> FarmResult<()> {
            DefaultRecordValidator.validate_revenue(revenue)
        }
    }

    #[test]
    fn test_rejected_harvest_leaves_no_revenue() {
        let mut manager = FarmManager::with_validator(MemoryStorage::new(), Box::new(NoHarvestValidator));
        let crop: Crop = manager
            .add(CropDraft::new(
                "1",
                CropType::Barley,
                "Malting",
                date(2024, 4, 1),
                date(2024, 7, 1),
            ))
            .unwrap();

        let result = manager.record_harvest(
            &crop.id,
            Harvest {
                yield_amount: BigDecimal::from(40),
                yield_unit: "bushels".to_string(),
                price_per_unit: BigDecimal::from(6),
                harvest_date: date(2024, 7, 2),
            },
        );

        assert!(matches!(result, Err(FarmError::Validation(_))));
        assert!(manager.list::<Revenue>().unwrap().is_empty());
        assert_eq!(
            manager.get_required::<Crop>(&crop.id).unwrap().status,
            CropStatus::Planted
        );
    }

    #[test]
    fn test_harvest_of_missing_crop_adds_nothing() {
        let mut manager = manager();
        let result = manager
            .record_harvest(
                "ghost",
                Harvest {
                    yield_amount: BigDecimal::from(1),
                    yield_unit: "tons".to_string(),
                    price_per_unit: BigDecimal::from(1),
                    harvest_date: date(2024, 7, 2),
                },
            )
            .unwrap();

        assert!(result.is_none());
        assert!(manager.list::<Revenue>().unwrap().is_empty());
    }

    #[test]
    fn test_dashboard_stats_and_recent_tasks() {
        let mut manager = manager();
        manager
            .add::<Farm>(FarmDraft::new("North Field", "", BigDecimal::from(50), SizeUnit::Acres))
            .unwrap();
        for title in ["One", "Two", "Three", "Four"] {
            manager.add::<Task>(TaskDraft::new("1", title, date(2024, 3, 1))).unwrap();
        }
        let first: Task = manager.list::<Task>().unwrap().remove(0);
        manager.toggle_task_completion(&first.id).unwrap();
        manager
            .add::<Expense>(ExpenseDraft::new(
                "1",
                BigDecimal::from(150),
                ExpenseCategory::Seeds,
                "Corn seed",
                date(2024, 3, 1),
            ))
            .unwrap();

        let stats = manager.dashboard_stats().unwrap();
        assert_eq!(stats.total_farms, 1);
        assert_eq!(stats.total_crops, 0);
        assert_eq!(stats.pending_tasks, 3);
        assert_eq!(stats.total_expenses, BigDecimal::from(150));

        let recent: Vec<String> = manager
            .recent_tasks()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(recent, vec!["One", "Two", "Three"]);
    }
}
