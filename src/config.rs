//! Dashboard configuration

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::*;
use crate::utils::InputPolicy;

/// Longest profit trend a config may ask for, in months
pub const MAX_TREND_MONTHS: u32 = 120;

/// Tunables for reporting and input handling
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// trend_months = 12
/// input_policy = "strict"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Calendar months covered by the profit trend, ending at the current month;
    /// between 1 and [`MAX_TREND_MONTHS`]
    pub trend_months: u32,
    /// Tasks shown in the dashboard's recent list
    pub recent_task_count: usize,
    /// Label used wherever a farm id doesn't resolve
    pub unknown_farm_label: String,
    /// Label used in exports when no farm filter is set
    pub all_farms_label: String,
    /// Export file names are `<prefix>-<YYYY-MM-DD>.json`
    pub export_file_prefix: String,
    pub input_policy: InputPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            trend_months: 6,
            recent_task_count: 3,
            unknown_farm_label: "Unknown Farm".to_string(),
            all_farms_label: "All Farms".to_string(),
            export_file_prefix: "profit-loss-report".to_string(),
            input_policy: InputPolicy::Lenient,
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> FarmResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| FarmError::Config(e.to_string()))?;
        config.validate()?;
        info!(
            trend_months = config.trend_months,
            input_policy = ?config.input_policy,
            "loaded dashboard config"
        );
        Ok(config)
    }

    /// Reject settings that would make reports meaningless
    pub fn validate(&self) -> FarmResult<()> {
        if self.trend_months == 0 {
            return Err(FarmError::Config(
                "trend_months must be at least 1".to_string(),
            ));
        }

        if self.trend_months > MAX_TREND_MONTHS {
            return Err(FarmError::Config(format!(
                "trend_months cannot exceed {}",
                MAX_TREND_MONTHS
            )));
        }

        if self.export_file_prefix.trim().is_empty() {
            return Err(FarmError::Config(
                "export_file_prefix cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
