//! Field access used by search, equality filters, ranges, and sorting

use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};

use super::{FarmNames, Filterable};
use crate::types::*;
use crate::utils::parse_date;

/// A single field's value, typed so comparisons follow the field's nature
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(BigDecimal),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Flag(bool),
    Priority(Priority),
}

impl FieldValue {
    fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }

    fn label(value: impl std::fmt::Display) -> Self {
        FieldValue::Text(value.to_string())
    }

    /// Ordering used by sorting
    ///
    /// Dates and timestamps compare chronologically, priorities by rank,
    /// flags as false < true. Values of different kinds compare equal so
    /// the stable sort leaves them where they were.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (FieldValue::Flag(a), FieldValue::Flag(b)) => a.cmp(b),
            (FieldValue::Priority(a), FieldValue::Priority(b)) => a.rank().cmp(&b.rank()),
            _ => Ordering::Equal,
        }
    }

    /// Exact match against a raw filter value
    pub fn matches(&self, expected: &str) -> bool {
        let expected = expected.trim();
        match self {
            FieldValue::Text(value) => value == expected,
            FieldValue::Number(value) => {
                BigDecimal::from_str(expected).is_ok_and(|wanted| *value == wanted)
            }
            FieldValue::Date(value) => parse_date(expected).is_ok_and(|wanted| *value == wanted),
            FieldValue::Timestamp(value) => {
                parse_date(expected).is_ok_and(|wanted| value.date() == wanted)
            }
            FieldValue::Flag(value) => expected
                .parse::<bool>()
                .is_ok_and(|wanted| *value == wanted),
            FieldValue::Priority(value) => value.label() == expected,
        }
    }

    /// Calendar date of date-like values
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            FieldValue::Timestamp(timestamp) => Some(timestamp.date()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&BigDecimal> {
        match self {
            FieldValue::Number(number) => Some(number),
            _ => None,
        }
    }
}

fn optional_text(value: &Option<String>) -> FieldValue {
    FieldValue::text(value.as_deref().unwrap_or(""))
}

impl Filterable for Farm {
    fn search_fields<'s>(&'s self, _farms: &'s FarmNames<'_>) -> Vec<&'s str> {
        vec![self.name.as_str(), self.location.as_str()]
    }

    fn field(&self, key: &str, _farms: &FarmNames<'_>) -> Option<FieldValue> {
        Some(match key {
            "id" => FieldValue::text(&self.id),
            "name" => FieldValue::text(&self.name),
            "location" => FieldValue::text(&self.location),
            "size" => FieldValue::Number(self.size.clone()),
            "size_unit" => FieldValue::label(self.size_unit),
            "created_at" | "created_date" => FieldValue::Timestamp(self.created_at),
            _ => return None,
        })
    }
}

impl Filterable for Crop {
    fn search_fields<'s>(&'s self, farms: &'s FarmNames<'_>) -> Vec<&'s str> {
        let mut fields = vec![
            self.crop_type.label(),
            self.variety.as_str(),
            farms.resolve(&self.farm_id),
        ];
        if let Some(notes) = &self.notes {
            fields.push(notes);
        }
        fields
    }

    fn field(&self, key: &str, farms: &FarmNames<'_>) -> Option<FieldValue> {
        Some(match key {
            "id" => FieldValue::text(&self.id),
            "farm_id" => FieldValue::text(&self.farm_id),
            "farm_name" => FieldValue::text(farms.resolve(&self.farm_id)),
            "crop_type" => FieldValue::label(self.crop_type),
            "variety" => FieldValue::text(&self.variety),
            "planting_date" => FieldValue::Date(self.planting_date),
            "expected_harvest_date" => FieldValue::Date(self.expected_harvest_date),
            "status" => FieldValue::label(self.status),
            "notes" => optional_text(&self.notes),
            "created_at" | "created_date" => FieldValue::Timestamp(self.created_at),
            _ => return None,
        })
    }
}

impl Filterable for Task {
    fn search_fields<'s>(&'s self, farms: &'s FarmNames<'_>) -> Vec<&'s str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.task_type.label(),
            farms.resolve(&self.farm_id),
        ]
    }

    fn field(&self, key: &str, farms: &FarmNames<'_>) -> Option<FieldValue> {
        Some(match key {
            "id" => FieldValue::text(&self.id),
            "farm_id" => FieldValue::text(&self.farm_id),
            "farm_name" => FieldValue::text(farms.resolve(&self.farm_id)),
            "crop_id" => optional_text(&self.crop_id),
            "title" => FieldValue::text(&self.title),
            "description" => FieldValue::text(&self.description),
            "due_date" => FieldValue::Date(self.due_date),
            "priority" => FieldValue::Priority(self.priority),
            "task_type" => FieldValue::label(self.task_type),
            "status" => FieldValue::label(self.status),
            "completed" => FieldValue::Flag(self.is_completed()),
            "created_at" | "created_date" => FieldValue::Timestamp(self.created_at),
            _ => return None,
        })
    }
}

impl Filterable for Expense {
    fn search_fields<'s>(&'s self, farms: &'s FarmNames<'_>) -> Vec<&'s str> {
        vec![
            self.description.as_str(),
            self.category.label(),
            farms.resolve(&self.farm_id),
        ]
    }

    fn field(&self, key: &str, farms: &FarmNames<'_>) -> Option<FieldValue> {
        Some(match key {
            "id" => FieldValue::text(&self.id),
            "farm_id" => FieldValue::text(&self.farm_id),
            "farm_name" => FieldValue::text(farms.resolve(&self.farm_id)),
            "amount" => FieldValue::Number(self.amount.clone()),
            "category" => FieldValue::label(self.category),
            "description" => FieldValue::text(&self.description),
            "date" => FieldValue::Date(self.date),
            "receipt" => optional_text(&self.receipt),
            "created_at" | "created_date" => FieldValue::Timestamp(self.created_at),
            _ => return None,
        })
    }
}

impl Filterable for Revenue {
    fn search_fields<'s>(&'s self, farms: &'s FarmNames<'_>) -> Vec<&'s str> {
        vec![self.crop_type.label(), farms.resolve(&self.farm_id)]
    }

    fn field(&self, key: &str, farms: &FarmNames<'_>) -> Option<FieldValue> {
        Some(match key {
            "id" => FieldValue::text(&self.id),
            "farm_id" => FieldValue::text(&self.farm_id),
            "farm_name" => FieldValue::text(farms.resolve(&self.farm_id)),
            "crop_type" => FieldValue::label(self.crop_type),
            "yield_amount" => FieldValue::Number(self.yield_amount.clone()),
            "yield_unit" => FieldValue::text(&self.yield_unit),
            "price_per_unit" => FieldValue::Number(self.price_per_unit.clone()),
            "harvest_date" => FieldValue::Date(self.harvest_date),
            "total_revenue" => FieldValue::Number(self.computed_total()),
            "created_at" | "created_date" => FieldValue::Timestamp(self.created_at),
            _ => return None,
        })
    }
}
