//! Drafts and patches for each record kind

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};

use crate::traits::*;
use crate::types::*;
use crate::utils::RecordTables;

/// Fields for a new farm
#[derive(Debug, Clone, PartialEq)]
pub struct FarmDraft {
    pub name: String,
    pub location: String,
    pub size: BigDecimal,
    pub size_unit: SizeUnit,
}

impl FarmDraft {
    pub fn new(name: &str, location: &str, size: BigDecimal, size_unit: SizeUnit) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            size,
            size_unit,
        }
    }
}

/// Farm fields to overwrite on update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub size: Option<BigDecimal>,
    pub size_unit: Option<SizeUnit>,
}

impl Entity for Farm {
    const KIND: EntityKind = EntityKind::Farm;
    type Draft = FarmDraft;
    type Patch = FarmPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, created_at: NaiveDateTime, draft: FarmDraft) -> Self {
        Self {
            id,
            name: draft.name,
            location: draft.location,
            size: draft.size,
            size_unit: draft.size_unit,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: FarmPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(size_unit) = patch.size_unit {
            self.size_unit = size_unit;
        }
    }

    fn validate_with(&self, validator: &dyn RecordValidator) -> FarmResult<()> {
        validator.validate_farm(self)
    }

    fn table(tables: &RecordTables) -> &Vec<Self> {
        &tables.farms
    }

    fn table_mut(tables: &mut RecordTables) -> &mut Vec<Self> {
        &mut tables.farms
    }
}

/// Fields for a new crop planting
#[derive(Debug, Clone, PartialEq)]
pub struct CropDraft {
    pub farm_id: String,
    pub crop_type: CropType,
    pub variety: String,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub status: CropStatus,
    pub notes: Option<String>,
}

impl CropDraft {
    /// A freshly planted crop with no notes
    pub fn new(
        farm_id: &str,
        crop_type: CropType,
        variety: &str,
        planting_date: NaiveDate,
        expected_harvest_date: NaiveDate,
    ) -> Self {
        Self {
            farm_id: farm_id.to_string(),
            crop_type,
            variety: variety.to_string(),
            planting_date,
            expected_harvest_date,
            status: CropStatus::Planted,
            notes: None,
        }
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// Crop fields to overwrite on update; `Some(None)` clears notes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropPatch {
    pub farm_id: Option<String>,
    pub crop_type: Option<CropType>,
    pub variety: Option<String>,
    pub planting_date: Option<NaiveDate>,
    pub expected_harvest_date: Option<NaiveDate>,
    pub status: Option<CropStatus>,
    pub notes: Option<Option<String>>,
}

impl Entity for Crop {
    const KIND: EntityKind = EntityKind::Crop;
    type Draft = CropDraft;
    type Patch = CropPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, created_at: NaiveDateTime, draft: CropDraft) -> Self {
        Self {
            id,
            farm_id: draft.farm_id,
            crop_type: draft.crop_type,
            variety: draft.variety,
            planting_date: draft.planting_date,
            expected_harvest_date: draft.expected_harvest_date,
            status: draft.status,
            notes: draft.notes,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: CropPatch) {
        if let Some(farm_id) = patch.farm_id {
            self.farm_id = farm_id;
        }
        if let Some(crop_type) = patch.crop_type {
            self.crop_type = crop_type;
        }
        if let Some(variety) = patch.variety {
            self.variety = variety;
        }
        if let Some(planting_date) = patch.planting_date {
            self.planting_date = planting_date;
        }
        if let Some(expected_harvest_date) = patch.expected_harvest_date {
            self.expected_harvest_date = expected_harvest_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn validate_with(&self, validator: &dyn RecordValidator) -> FarmResult<()> {
        validator.validate_crop(self)
    }

    fn table(tables: &RecordTables) -> &Vec<Self> {
        &tables.crops
    }

    fn table_mut(tables: &mut RecordTables) -> &mut Vec<Self> {
        &mut tables.crops
    }
}

/// Fields for a new task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub farm_id: String,
    pub crop_id: Option<String>,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub task_type: TaskType,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// A not-started, medium-priority task of type Other
    pub fn new(farm_id: &str, title: &str, due_date: NaiveDate) -> Self {
        Self {
            farm_id: farm_id.to_string(),
            crop_id: None,
            title: title.to_string(),
            description: String::new(),
            due_date,
            priority: Priority::Medium,
            task_type: TaskType::Other,
            status: TaskStatus::NotStarted,
        }
    }

    pub fn crop(mut self, crop_id: &str) -> Self {
        self.crop_id = Some(crop_id.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Task fields to overwrite on update; `Some(None)` detaches the crop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub farm_id: Option<String>,
    pub crop_id: Option<Option<String>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, created_at: NaiveDateTime, draft: TaskDraft) -> Self {
        Self {
            id,
            farm_id: draft.farm_id,
            crop_id: draft.crop_id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            task_type: draft.task_type,
            status: draft.status,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(farm_id) = patch.farm_id {
            self.farm_id = farm_id;
        }
        if let Some(crop_id) = patch.crop_id {
            self.crop_id = crop_id;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(task_type) = patch.task_type {
            self.task_type = task_type;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn validate_with(&self, validator: &dyn RecordValidator) -> FarmResult<()> {
        validator.validate_task(self)
    }

    fn table(tables: &RecordTables) -> &Vec<Self> {
        &tables.tasks
    }

    fn table_mut(tables: &mut RecordTables) -> &mut Vec<Self> {
        &mut tables.tasks
    }
}

/// Fields for a new expense
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub farm_id: String,
    pub amount: BigDecimal,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
    pub receipt: Option<String>,
}

impl ExpenseDraft {
    pub fn new(
        farm_id: &str,
        amount: BigDecimal,
        category: ExpenseCategory,
        description: &str,
        date: NaiveDate,
    ) -> Self {
        Self {
            farm_id: farm_id.to_string(),
            amount,
            category,
            description: description.to_string(),
            date,
            receipt: None,
        }
    }

    pub fn receipt(mut self, receipt: &str) -> Self {
        self.receipt = Some(receipt.to_string());
        self
    }
}

/// Expense fields to overwrite on update; `Some(None)` clears the receipt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub farm_id: Option<String>,
    pub amount: Option<BigDecimal>,
    pub category: Option<ExpenseCategory>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub receipt: Option<Option<String>>,
}

impl Entity for Expense {
    const KIND: EntityKind = EntityKind::Expense;
    type Draft = ExpenseDraft;
    type Patch = ExpensePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, created_at: NaiveDateTime, draft: ExpenseDraft) -> Self {
        Self {
            id,
            farm_id: draft.farm_id,
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            receipt: draft.receipt,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: ExpensePatch) {
        if let Some(farm_id) = patch.farm_id {
            self.farm_id = farm_id;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(receipt) = patch.receipt {
            self.receipt = receipt;
        }
    }

    fn validate_with(&self, validator: &dyn RecordValidator) -> FarmResult<()> {
        validator.validate_expense(self)
    }

    fn table(tables: &RecordTables) -> &Vec<Self> {
        &tables.expenses
    }

    fn table_mut(tables: &mut RecordTables) -> &mut Vec<Self> {
        &mut tables.expenses
    }
}

/// Fields for a new revenue record
///
/// The stored total is always derived from yield and price, so it is not
/// part of the draft.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueDraft {
    pub farm_id: String,
    pub crop_type: CropType,
    pub yield_amount: BigDecimal,
    pub yield_unit: String,
    pub price_per_unit: BigDecimal,
    pub harvest_date: NaiveDate,
}

impl RevenueDraft {
    pub fn new(
        farm_id: &str,
        crop_type: CropType,
        yield_amount: BigDecimal,
        yield_unit: &str,
        price_per_unit: BigDecimal,
        harvest_date: NaiveDate,
    ) -> Self {
        Self {
            farm_id: farm_id.to_string(),
            crop_type,
            yield_amount,
            yield_unit: yield_unit.to_string(),
            price_per_unit,
            harvest_date,
        }
    }
}

/// Revenue fields to overwrite on update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenuePatch {
    pub farm_id: Option<String>,
    pub crop_type: Option<CropType>,
    pub yield_amount: Option<BigDecimal>,
    pub yield_unit: Option<String>,
    pub price_per_unit: Option<BigDecimal>,
    pub harvest_date: Option<NaiveDate>,
}

impl Entity for Revenue {
    const KIND: EntityKind = EntityKind::Revenue;
    type Draft = RevenueDraft;
    type Patch = RevenuePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, created_at: NaiveDateTime, draft: RevenueDraft) -> Self {
        let total_revenue = &draft.yield_amount * &draft.price_per_unit;
        Self {
            id,
            farm_id: draft.farm_id,
            crop_type: draft.crop_type,
            yield_amount: draft.yield_amount,
            yield_unit: draft.yield_unit,
            price_per_unit: draft.price_per_unit,
            harvest_date: draft.harvest_date,
            total_revenue,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: RevenuePatch) {
        if let Some(farm_id) = patch.farm_id {
            self.farm_id = farm_id;
        }
        if let Some(crop_type) = patch.crop_type {
            self.crop_type = crop_type;
        }
        if let Some(yield_amount) = patch.yield_amount {
            self.yield_amount = yield_amount;
        }
        if let Some(yield_unit) = patch.yield_unit {
            self.yield_unit = yield_unit;
        }
        if let Some(price_per_unit) = patch.price_per_unit {
            self.price_per_unit = price_per_unit;
        }
        if let Some(harvest_date) = patch.harvest_date {
            self.harvest_date = harvest_date;
        }
        self.total_revenue = self.computed_total();
    }

    fn validate_with(&self, validator: &dyn RecordValidator) -> FarmResult<()> {
        validator.validate_revenue(self)
    }

    fn table(tables: &RecordTables) -> &Vec<Self> {
        &tables.revenues
    }

    fn table_mut(tables: &mut RecordTables) -> &mut Vec<Self> {
        &mut tables.revenues
    }
}
