//! Chart-ready series and the farm comparison table

use bigdecimal::BigDecimal;
use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use super::export::ReportSnapshot;
use super::profit_loss::{compute_profit_loss, CategoryBreakdown, ProfitLossSummary, ReportScope};
use crate::config::{DashboardConfig, MAX_TREND_MONTHS};
use crate::filter::FarmNames;
use crate::types::*;

/// Parallel label/value lists, ready for a pie, bar, or line chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<BigDecimal>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Net profit for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub month_start: NaiveDate,
    /// Short month name, e.g. "Jan"
    pub label: String,
    pub net_profit: BigDecimal,
}

/// Rolling monthly net-profit series, oldest month first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfitTrend {
    pub points: Vec<TrendPoint>,
}

impl ProfitTrend {
    pub fn series(&self) -> ChartSeries {
        ChartSeries {
            labels: self.points.iter().map(|p| p.label.clone()).collect(),
            values: self.points.iter().map(|p| p.net_profit.clone()).collect(),
        }
    }
}

/// One farm's totals for a date range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmComparisonRow {
    pub farm_id: String,
    pub farm_name: String,
    pub revenue: BigDecimal,
    pub expenses: BigDecimal,
    pub net_profit: BigDecimal,
}

/// Pie-chart series for a category breakdown, in the breakdown's order
pub fn expense_chart(breakdown: &CategoryBreakdown) -> ChartSeries {
    ChartSeries {
        labels: breakdown.iter().map(|e| e.category.label().to_string()).collect(),
        values: breakdown.iter().map(|e| e.amount.clone()).collect(),
    }
}

/// First day of each of the `months` calendar months ending with the month of `today`
pub fn trailing_months(today: NaiveDate, months: u32) -> Vec<NaiveDate> {
    let current = ReportScope::month_of(today).date_from;
    (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}

/// Snapshot of the records a set of reports is computed from
///
/// Every method is a pure function of the snapshot and its arguments; the
/// clock is never read, so "today" and generation instants are passed in.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    farms: Vec<Farm>,
    expenses: Vec<Expense>,
    revenues: Vec<Revenue>,
    config: DashboardConfig,
}

impl ReportBuilder {
    pub fn new(
        farms: Vec<Farm>,
        expenses: Vec<Expense>,
        revenues: Vec<Revenue>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            farms,
            expenses,
            revenues,
            config,
        }
    }

    pub fn farm_names(&self) -> FarmNames<'_> {
        FarmNames::new(&self.farms, &self.config.unknown_farm_label)
    }

    /// Profit/loss for a date range, optionally narrowed to one farm
    pub fn profit_loss(&self, scope: &ReportScope) -> ProfitLossSummary {
        compute_profit_loss(&self.expenses, &self.revenues, scope)
    }

    /// Pie-chart series for a summary's category breakdown
    pub fn expense_chart(&self, breakdown: &CategoryBreakdown) -> ChartSeries {
        expense_chart(breakdown)
    }

    /// Net profit across all farms for each trailing calendar month
    ///
    /// The month count is capped at [`MAX_TREND_MONTHS`] even when the config
    /// was built without [`DashboardConfig::validate`].
    pub fn profit_trend(&self, today: NaiveDate) -> ProfitTrend {
        let months = self.config.trend_months.min(MAX_TREND_MONTHS);
        let points = trailing_months(today, months)
            .into_iter()
            .map(|month_start| {
                let summary = self.profit_loss(&ReportScope::month_of(month_start));
                TrendPoint {
                    month_start,
                    label: month_start.format("%b").to_string(),
                    net_profit: summary.net_profit,
                }
            })
            .collect();

        ProfitTrend { points }
    }

    /// Totals for every farm over a date range, in farm order
    ///
    /// Farms with no activity still get a row of zeros.
    pub fn farm_comparison(&self, date_from: NaiveDate, date_to: NaiveDate) -> Vec<FarmComparisonRow> {
        let rows: Vec<FarmComparisonRow> = self
            .farms
            .iter()
            .map(|farm| {
                let scope = ReportScope::new(date_from, date_to).for_farm(&farm.id);
                let summary = self.profit_loss(&scope);
                FarmComparisonRow {
                    farm_id: farm.id.clone(),
                    farm_name: farm.name.clone(),
                    revenue: summary.total_revenue,
                    expenses: summary.total_expenses,
                    net_profit: summary.net_profit,
                }
            })
            .collect();

        debug!(farms = rows.len(), from = %date_from, to = %date_to, "built farm comparison");
        rows
    }

    /// Exportable snapshot of a profit/loss report
    pub fn snapshot(&self, scope: &ReportScope, generated_at: DateTime<Utc>) -> ReportSnapshot {
        let farm = match scope.farm_id.as_deref() {
            Some(farm_id) => self.farm_names().resolve(farm_id).to_string(),
            None => self.config.all_farms_label.clone(),
        };

        ReportSnapshot {
            period: format!("{} to {}", scope.date_from, scope.date_to),
            farm,
            summary: self.profit_loss(scope),
            generated_at,
        }
    }

    /// File name the snapshot should be saved under
    pub fn export_file_name(&self, snapshot: &ReportSnapshot) -> String {
        snapshot.file_name(&self.config.export_file_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ExpenseDraft, FarmDraft, RevenueDraft};
    use crate::traits::Entity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn farm(id: &str, name: &str) -> Farm {
        Farm::from_draft(
            id.to_string(),
            date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
            FarmDraft::new(name, "", BigDecimal::from(10), SizeUnit::Acres),
        )
    }

    fn expense(id: &str, farm: &str, amount: i64, category: ExpenseCategory, on: NaiveDate) -> Expense {
        Expense::from_draft(
            id.to_string(),
            on.and_hms_opt(0, 0, 0).unwrap(),
            ExpenseDraft::new(farm, BigDecimal::from(amount), category, "", on),
        )
    }

    fn revenue(id: &str, farm: &str, total: i64, on: NaiveDate) -> Revenue {
        Revenue::from_draft(
            id.to_string(),
            on.and_hms_opt(0, 0, 0).unwrap(),
            RevenueDraft::new(
                farm,
                CropType::Wheat,
                BigDecimal::from(total),
                "bushels",
                BigDecimal::from(1),
                on,
            ),
        )
    }

    #[test]
    fn test_trailing_months_cross_year_boundary() {
        let months = trailing_months(date(2024, 2, 14), 6);
        assert_eq!(
            months,
            vec![
                date(2023, 9, 1),
                date(2023, 10, 1),
                date(2023, 11, 1),
                date(2023, 12, 1),
                date(2024, 1, 1),
                date(2024, 2, 1),
            ]
        );
    }

    #[test]
    fn test_profit_trend_buckets_by_calendar_month() {
        let builder = ReportBuilder::new(
            vec![farm("1", "North Field")],
            vec![
                expense("e1", "1", 100, ExpenseCategory::Seeds, date(2024, 1, 31)),
                expense("e2", "1", 50, ExpenseCategory::Fuel, date(2024, 3, 1)),
                expense("old", "1", 999, ExpenseCategory::Fuel, date(2023, 9, 30)),
            ],
            vec![revenue("r1", "2", 400, date(2024, 3, 31))],
            DashboardConfig::default(),
        );

        let trend = builder.profit_trend(date(2024, 3, 15));
        let series = trend.series();

        assert_eq!(series.labels, vec!["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert_eq!(
            series.values,
            vec![
                BigDecimal::from(0),
                BigDecimal::from(0),
                BigDecimal::from(0),
                BigDecimal::from(-100),
                BigDecimal::from(0),
                BigDecimal::from(350),
            ]
        );
    }

    #[test]
    fn test_unvalidated_trend_length_is_capped() {
        let config = DashboardConfig {
            trend_months: u32::MAX,
            ..DashboardConfig::default()
        };
        let builder = ReportBuilder::new(vec![], vec![], vec![], config);

        let trend = builder.profit_trend(date(2024, 3, 15));
        assert_eq!(trend.points.len(), MAX_TREND_MONTHS as usize);
        assert_eq!(trend.points.last().unwrap().month_start, date(2024, 3, 1));
    }

    #[test]
    fn test_expense_chart_follows_breakdown_order() {
        let on = date(2024, 3, 5);
        let builder = ReportBuilder::new(
            vec![farm("1", "North Field")],
            vec![
                expense("e1", "1", 70, ExpenseCategory::Labor, on),
                expense("e2", "1", 30, ExpenseCategory::Seeds, on),
            ],
            vec![],
            DashboardConfig::default(),
        );

        let summary = builder.profit_loss(&ReportScope::month_of(on).for_farm("1"));
        let chart = builder.expense_chart(&summary.expense_by_category);

        assert_eq!(chart.labels, vec!["Labor", "Seeds"]);
        assert_eq!(chart.values, vec![BigDecimal::from(70), BigDecimal::from(30)]);
    }

    #[test]
    fn test_farm_comparison_keeps_idle_farms() {
        let on = date(2024, 3, 5);
        let builder = ReportBuilder::new(
            vec![farm("1", "North Field"), farm("2", "South Field")],
            vec![expense("e1", "1", 150, ExpenseCategory::Seeds, on)],
            vec![],
            DashboardConfig::default(),
        );

        let rows = builder.farm_comparison(date(2024, 3, 1), date(2024, 3, 31));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].farm_id, "1");
        assert_eq!(rows[0].expenses, BigDecimal::from(150));
        assert_eq!(rows[0].net_profit, BigDecimal::from(-150));
        assert_eq!(rows[1].farm_name, "South Field");
        assert_eq!(rows[1].revenue, BigDecimal::from(0));
        assert_eq!(rows[1].expenses, BigDecimal::from(0));
        assert_eq!(rows[1].net_profit, BigDecimal::from(0));
    }

    #[test]
    fn test_snapshot_labels_farm_scope() {
        let builder = ReportBuilder::new(
            vec![farm("1", "North Field")],
            vec![],
            vec![],
            DashboardConfig::default(),
        );
        let scope = ReportScope::new(date(2024, 3, 1), date(2024, 3, 31));
        let generated_at = date(2024, 4, 2).and_hms_opt(9, 0, 0).unwrap().and_utc();

        assert_eq!(builder.snapshot(&scope, generated_at).farm, "All Farms");
        assert_eq!(
            builder.snapshot(&scope.clone().for_farm("1"), generated_at).farm,
            "North Field"
        );
        assert_eq!(
            builder.snapshot(&scope.for_farm("missing"), generated_at).farm,
            "Unknown Farm"
        );
    }
}
