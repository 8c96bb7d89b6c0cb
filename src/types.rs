//! Core types and data structures for farm records

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Declares a closed set of variants that travel as human-readable labels.
///
/// Every generated enum gets `ALL`, `label()`, `Display`, and a
/// case-insensitive `FromStr` that reports unknown labels as
/// [`FarmError::InvalidInput`].
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Display label used in forms, filters, and exports
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = FarmError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        FarmError::InvalidInput(format!(
                            "unknown {} '{}'",
                            stringify!($name),
                            raw
                        ))
                    })
            }
        }
    };
}

labelled_enum! {
    /// Record collections held by the store
    EntityKind {
        Farm => "farm",
        Crop => "crop",
        Task => "task",
        Expense => "expense",
        Revenue => "revenue",
    }
}

labelled_enum! {
    /// Unit a farm's size is measured in
    SizeUnit {
        Acres => "acres",
        Hectares => "hectares",
    }
}

labelled_enum! {
    /// Crops that can be logged against a farm
    CropType {
        Corn => "Corn",
        Wheat => "Wheat",
        Soybeans => "Soybeans",
        Rice => "Rice",
        Barley => "Barley",
        Oats => "Oats",
        Tomatoes => "Tomatoes",
        Potatoes => "Potatoes",
        Lettuce => "Lettuce",
        Carrots => "Carrots",
    }
}

labelled_enum! {
    /// Growth stage of a planted crop
    CropStatus {
        Planted => "Planted",
        Growing => "Growing",
        /// Set automatically when a harvest is recorded
        Harvested => "Harvested",
        Failed => "Failed",
    }
}

labelled_enum! {
    /// Task urgency
    Priority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

impl Priority {
    /// Sort rank: Low < Medium < High
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

labelled_enum! {
    /// Kind of field work a task represents
    TaskType {
        Planting => "Planting",
        Watering => "Watering",
        Fertilizing => "Fertilizing",
        Weeding => "Weeding",
        Harvesting => "Harvesting",
        PestControl => "Pest Control",
        Maintenance => "Maintenance",
        Other => "Other",
    }
}

labelled_enum! {
    /// Progress of a task. This is the only completion signal a task carries.
    TaskStatus {
        NotStarted => "Not Started",
        InProgress => "In Progress",
        Completed => "Completed",
        OnHold => "On Hold",
    }
}

labelled_enum! {
    /// Expense buckets used for the category breakdown
    ExpenseCategory {
        Seeds => "Seeds",
        Fertilizer => "Fertilizer",
        Pesticides => "Pesticides",
        Equipment => "Equipment",
        Fuel => "Fuel",
        Labor => "Labor",
        Irrigation => "Irrigation",
        Utilities => "Utilities",
        Maintenance => "Maintenance",
        Insurance => "Insurance",
        Feed => "Feed",
        Veterinary => "Veterinary",
        Transportation => "Transportation",
        Other => "Other",
    }
}

/// A farm that crops, tasks, expenses, and revenue hang off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    /// Unique identifier, assigned by the store
    pub id: String,
    /// Human-readable farm name
    pub name: String,
    /// Free-text location
    pub location: String,
    /// Farm area, measured in `size_unit`
    pub size: BigDecimal,
    pub size_unit: SizeUnit,
    /// When the farm was added
    pub created_at: NaiveDateTime,
}

/// A planting of one crop on one farm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: String,
    /// Owning farm; may dangle after the farm is removed
    pub farm_id: String,
    pub crop_type: CropType,
    /// Free-text variety, e.g. "Sweet Corn"
    pub variety: String,
    pub planting_date: NaiveDate,
    /// Expected to be on or after `planting_date`; only the strict validator enforces it
    pub expected_harvest_date: NaiveDate,
    pub status: CropStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A scheduled piece of farm work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub farm_id: String,
    /// Crop the task concerns, if any
    pub crop_id: Option<String>,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
}

impl Task {
    /// Completion view derived from `status`
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Money spent on a farm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub farm_id: String,
    /// Non-negative amount in the dashboard's currency
    #[serde(with = "bigdecimal::serde::json_num")]
    pub amount: BigDecimal,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
    /// Optional receipt reference (file name, URL, or number)
    pub receipt: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Income from selling a harvest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    pub id: String,
    pub farm_id: String,
    pub crop_type: CropType,
    #[serde(with = "bigdecimal::serde::json_num")]
    pub yield_amount: BigDecimal,
    /// Unit the yield is measured in, e.g. "bushels"
    pub yield_unit: String,
    #[serde(with = "bigdecimal::serde::json_num")]
    pub price_per_unit: BigDecimal,
    pub harvest_date: NaiveDate,
    /// Stored total; reports use [`Revenue::computed_total`] instead
    #[serde(with = "bigdecimal::serde::json_num")]
    pub total_revenue: BigDecimal,
    pub created_at: NaiveDateTime,
}

impl Revenue {
    /// `yield_amount * price_per_unit`, independent of the stored total
    pub fn computed_total(&self) -> BigDecimal {
        &self.yield_amount * &self.price_per_unit
    }
}

/// Errors that can occur in the farm ledger
#[derive(Debug, thiserror::Error)]
pub enum FarmError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    #[error("Export error: {0}")]
    Export(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for farm ledger operations
pub type FarmResult<T> = Result<T, FarmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_case_insensitively() {
        assert_eq!("pest control".parse::<TaskType>().unwrap(), TaskType::PestControl);
        assert_eq!(" HIGH ".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("hectares".parse::<SizeUnit>().unwrap(), SizeUnit::Hectares);
        assert!("Tractors".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn test_enum_sizes() {
        assert_eq!(CropType::ALL.len(), 10);
        assert_eq!(TaskType::ALL.len(), 8);
        assert_eq!(ExpenseCategory::ALL.len(), 14);
    }

    #[test]
    fn test_priority_rank() {
        assert!(Priority::Low.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::High.rank());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&TaskStatus::NotStarted).unwrap();
        assert_eq!(json, "\"Not Started\"");
        let status: TaskStatus = serde_json::from_str("\"On Hold\"").unwrap();
        assert_eq!(status, TaskStatus::OnHold);
    }

    #[test]
    fn test_revenue_computed_total_ignores_stale_field() {
        let revenue = Revenue {
            id: "r1".to_string(),
            farm_id: "1".to_string(),
            crop_type: CropType::Corn,
            yield_amount: BigDecimal::from(100),
            yield_unit: "bushels".to_string(),
            price_per_unit: BigDecimal::from(4),
            harvest_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            total_revenue: BigDecimal::from(1),
            created_at: NaiveDate::from_ymd_opt(2024, 9, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        assert_eq!(revenue.computed_total(), BigDecimal::from(400));
    }
}
