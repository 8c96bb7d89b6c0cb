//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is zero or more
pub fn validate_non_negative(field: &str, amount: &BigDecimal) -> FarmResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(FarmError::Validation(format!("{} cannot be negative", field)))
    } else {
        Ok(())
    }
}

/// Validate a required text field against a maximum length
pub fn validate_required_text(field: &str, value: &str, max_len: usize) -> FarmResult<()> {
    if value.trim().is_empty() {
        return Err(FarmError::Validation(format!("{} cannot be empty", field)));
    }

    validate_optional_text(field, value, max_len)
}

/// Validate an optional text field against a maximum length
pub fn validate_optional_text(field: &str, value: &str, max_len: usize) -> FarmResult<()> {
    if value.chars().count() > max_len {
        return Err(FarmError::Validation(format!(
            "{} cannot exceed {} characters",
            field, max_len
        )));
    }

    Ok(())
}

/// Validate that a record points at some farm
pub fn validate_farm_reference(farm_id: &str) -> FarmResult<()> {
    if farm_id.trim().is_empty() {
        return Err(FarmError::Validation(
            "Farm reference cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validator that layers length limits, date ordering, and reference
/// checks on top of [`DefaultRecordValidator`]
pub struct StrictRecordValidator;

impl RecordValidator for StrictRecordValidator {
    fn validate_farm(&self, farm: &Farm) -> FarmResult<()> {
        DefaultRecordValidator.validate_farm(farm)?;
        validate_required_text("Farm name", &farm.name, 100)?;
        validate_optional_text("Farm location", &farm.location, 200)
    }

    fn validate_crop(&self, crop: &Crop) -> FarmResult<()> {
        DefaultRecordValidator.validate_crop(crop)?;
        validate_farm_reference(&crop.farm_id)?;
        validate_optional_text("Crop variety", &crop.variety, 100)?;
        if let Some(notes) = &crop.notes {
            validate_optional_text("Crop notes", notes, 1000)?;
        }

        if crop.expected_harvest_date < crop.planting_date {
            return Err(FarmError::Validation(format!(
                "Expected harvest date {} is before planting date {}",
                crop.expected_harvest_date, crop.planting_date
            )));
        }

        Ok(())
    }

    fn validate_task(&self, task: &Task) -> FarmResult<()> {
        DefaultRecordValidator.validate_task(task)?;
        validate_farm_reference(&task.farm_id)?;
        validate_required_text("Task title", &task.title, 200)?;
        validate_optional_text("Task description", &task.description, 1000)
    }

    fn validate_expense(&self, expense: &Expense) -> FarmResult<()> {
        DefaultRecordValidator.validate_expense(expense)?;
        validate_farm_reference(&expense.farm_id)?;
        validate_optional_text("Expense description", &expense.description, 500)
    }

    fn validate_revenue(&self, revenue: &Revenue) -> FarmResult<()> {
        DefaultRecordValidator.validate_revenue(revenue)?;
        validate_farm_reference(&revenue.farm_id)?;
        validate_non_negative("Total revenue", &revenue.total_revenue)
    }
}
