//! JSON export of a profit/loss report

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::profit_loss::ProfitLossSummary;
use crate::types::*;

/// A profit/loss report frozen for download
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    /// `"<from> to <to>"`
    pub period: String,
    /// Farm name, the unknown-farm label, or the all-farms label
    pub farm: String,
    pub summary: ProfitLossSummary,
    pub generated_at: DateTime<Utc>,
}

impl ReportSnapshot {
    /// `<prefix>-<YYYY-MM-DD>.json`, dated by generation time
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}-{}.json", prefix, self.generated_at.format("%Y-%m-%d"))
    }

    pub fn to_json(&self) -> FarmResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FarmError::Export(e.to_string()))
    }
}
