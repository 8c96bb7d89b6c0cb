//! # Farm Ledger
//!
//! In-memory farm records with search, profit/loss aggregation, and
//! chart-ready reporting.
//!
//! ## Features
//!
//! - **Entity store**: farms, crops, tasks, expenses, and harvest revenue with add/update/remove
//! - **Filtering**: free-text search, exact-match and range filters, typed multi-key sorting
//! - **Profit/loss**: totals, margin, and per-category expense breakdown for any date range and farm
//! - **Reports**: expense pie series, rolling monthly profit trend, and per-farm comparison
//! - **Export**: JSON report snapshots
//! - **Storage abstraction**: the store runs over any [`FarmStorage`] backend
//!
//! ## Quick Start
//!
//! ```rust
//! use farm_ledger::utils::MemoryStorage;
//! use farm_ledger::{ExpenseCategory, ExpenseDraft, Expense, FarmManager, ReportScope};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let mut manager = FarmManager::new(MemoryStorage::new());
//! let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! manager
//!     .add::<Expense>(ExpenseDraft::new(
//!         "1",
//!         BigDecimal::from(150),
//!         ExpenseCategory::Seeds,
//!         "Corn seed",
//!         march,
//!     ))
//!     .unwrap();
//!
//! let summary = manager.profit_loss(&ReportScope::month_of(march)).unwrap();
//! assert_eq!(summary.net_profit, BigDecimal::from(-150));
//! ```

pub mod config;
pub mod filter;
pub mod report;
pub mod store;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use filter::{FilterEngine, FilterQuery, SortDirection};
pub use report::*;
pub use store::*;
pub use traits::*;
pub use types::*;
