//! Profit/loss aggregation over expenses and revenue

use bigdecimal::BigDecimal;
use chrono::{Datelike, Months, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::types::*;

/// Date range and optional farm a report is narrowed to
///
/// Both bounds are inclusive calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportScope {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub farm_id: Option<String>,
}

impl ReportScope {
    /// All farms between two dates
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from,
            date_to,
            farm_id: None,
        }
    }

    /// Narrow the scope to one farm
    pub fn for_farm(mut self, farm_id: &str) -> Self {
        self.farm_id = Some(farm_id.to_string());
        self
    }

    /// First to last day of the calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first);
        Self::new(first, last)
    }

    /// Whether a record dated `date` on `farm_id` falls inside the scope
    pub fn contains(&self, date: NaiveDate, farm_id: &str) -> bool {
        date >= self.date_from
            && date <= self.date_to
            && self.farm_id.as_deref().is_none_or(|wanted| wanted == farm_id)
    }
}

/// Decimal places kept in a profit margin
pub const MARGIN_SCALE: i64 = 2;

/// Summed amount for one expense category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    #[serde(with = "bigdecimal::serde::json_num")]
    pub amount: BigDecimal,
}

/// Writes an amount as a JSON number rather than a string
#[derive(Serialize)]
struct JsonAmount<'a>(#[serde(serialize_with = "amount_as_number")] &'a BigDecimal);

fn amount_as_number<S: Serializer>(amount: &&BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    bigdecimal::serde::json_num::serialize(amount, serializer)
}

/// Expense totals per category, in the order each category was first seen
///
/// Only categories that actually occur are present. Serializes as a JSON
/// object keyed by category label, keeping that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    entries: Vec<CategoryTotal>,
}

impl CategoryBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to a category, appending it if unseen
    pub fn add(&mut self, category: ExpenseCategory, amount: &BigDecimal) {
        match self.entries.iter_mut().find(|e| e.category == category) {
            Some(entry) => entry.amount += amount,
            None => self.entries.push(CategoryTotal {
                category,
                amount: amount.clone(),
            }),
        }
    }

    pub fn get(&self, category: ExpenseCategory) -> Option<&BigDecimal> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| &e.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.entries.iter()
    }

    pub fn categories(&self) -> Vec<ExpenseCategory> {
        self.entries.iter().map(|e| e.category).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> BigDecimal {
        self.entries.iter().map(|e| &e.amount).sum()
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.category.label(), &JsonAmount(&entry.amount))?;
        }
        map.end()
    }
}

/// Profit/loss for one scope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossSummary {
    #[serde(with = "bigdecimal::serde::json_num")]
    pub total_expenses: BigDecimal,
    #[serde(with = "bigdecimal::serde::json_num")]
    pub total_revenue: BigDecimal,
    /// Always `total_revenue - total_expenses`
    #[serde(with = "bigdecimal::serde::json_num")]
    pub net_profit: BigDecimal,
    /// Net profit as a percentage of revenue, rounded to [`MARGIN_SCALE`]
    /// places; zero when there is no revenue
    #[serde(with = "bigdecimal::serde::json_num")]
    pub profit_margin: BigDecimal,
    pub expense_by_category: CategoryBreakdown,
    /// Expenses inside the scope, in store order
    pub expenses: Vec<Expense>,
    /// Revenue inside the scope, in store order
    pub revenues: Vec<Revenue>,
}

impl ProfitLossSummary {
    pub fn is_profitable(&self) -> bool {
        self.net_profit > BigDecimal::from(0)
    }
}

/// Net profit as a percentage of revenue, rounded to [`MARGIN_SCALE`] decimal places
///
/// Zero revenue gives a margin of zero rather than a division by zero. That
/// is a reporting convention, not an arithmetic identity.
pub fn profit_margin(net_profit: &BigDecimal, total_revenue: &BigDecimal) -> BigDecimal {
    if *total_revenue > BigDecimal::from(0) {
        (net_profit / total_revenue * BigDecimal::from(100)).round(MARGIN_SCALE)
    } else {
        BigDecimal::from(0)
    }
}

/// Aggregate expenses and revenue that fall inside `scope`
///
/// Expenses are matched on `date` and revenue on `harvest_date`. Revenue
/// totals are recomputed from yield and price rather than read from the
/// stored total. A farm id with no records simply yields an empty summary.
pub fn compute_profit_loss(
    expenses: &[Expense],
    revenues: &[Revenue],
    scope: &ReportScope,
) -> ProfitLossSummary {
    let expenses: Vec<Expense> = expenses
        .iter()
        .filter(|e| scope.contains(e.date, &e.farm_id))
        .cloned()
        .collect();
    let revenues: Vec<Revenue> = revenues
        .iter()
        .filter(|r| scope.contains(r.harvest_date, &r.farm_id))
        .cloned()
        .collect();

    let mut expense_by_category = CategoryBreakdown::new();
    for expense in &expenses {
        expense_by_category.add(expense.category, &expense.amount);
    }

    let total_expenses: BigDecimal = expenses.iter().map(|e| &e.amount).sum();
    let total_revenue: BigDecimal = revenues.iter().map(|r| r.computed_total()).sum();
    let net_profit = &total_revenue - &total_expenses;
    let profit_margin = profit_margin(&net_profit, &total_revenue);

    debug!(
        from = %scope.date_from,
        to = %scope.date_to,
        farm = scope.farm_id.as_deref().unwrap_or("*"),
        expenses = expenses.len(),
        revenues = revenues.len(),
        %net_profit,
        "computed profit/loss"
    );

    ProfitLossSummary {
        total_expenses,
        total_revenue,
        net_profit,
        profit_margin,
        expense_by_category,
        expenses,
        revenues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ExpenseDraft, RevenueDraft};
    use crate::traits::Entity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(id: &str, farm: &str, amount: i64, category: ExpenseCategory, on: NaiveDate) -> Expense {
        Expense::from_draft(
            id.to_string(),
            on.and_hms_opt(0, 0, 0).unwrap(),
            ExpenseDraft::new(farm, BigDecimal::from(amount), category, "", on),
        )
    }

    fn revenue(id: &str, farm: &str, bushels: i64, price: i64, on: NaiveDate) -> Revenue {
        Revenue::from_draft(
            id.to_string(),
            on.and_hms_opt(0, 0, 0).unwrap(),
            RevenueDraft::new(
                farm,
                CropType::Corn,
                BigDecimal::from(bushels),
                "bushels",
                BigDecimal::from(price),
                on,
            ),
        )
    }

    #[test]
    fn test_month_of_uses_calendar_bounds() {
        let feb = ReportScope::month_of(date(2024, 2, 17));
        assert_eq!(feb.date_from, date(2024, 2, 1));
        assert_eq!(feb.date_to, date(2024, 2, 29));

        let dec = ReportScope::month_of(date(2023, 12, 31));
        assert_eq!(dec.date_to, date(2023, 12, 31));
    }

    #[test]
    fn test_scope_bounds_are_inclusive() {
        let scope = ReportScope::new(date(2024, 3, 1), date(2024, 3, 31)).for_farm("1");
        assert!(scope.contains(date(2024, 3, 1), "1"));
        assert!(scope.contains(date(2024, 3, 31), "1"));
        assert!(!scope.contains(date(2024, 4, 1), "1"));
        assert!(!scope.contains(date(2024, 3, 15), "2"));
    }

    #[test]
    fn test_single_expense_no_revenue() {
        let expenses = vec![expense("1", "1", 150, ExpenseCategory::Seeds, date(2024, 3, 1))];
        let scope = ReportScope::new(date(2024, 3, 1), date(2024, 3, 31)).for_farm("1");

        let summary = compute_profit_loss(&expenses, &[], &scope);

        assert_eq!(summary.total_expenses, BigDecimal::from(150));
        assert_eq!(summary.total_revenue, BigDecimal::from(0));
        assert_eq!(summary.net_profit, BigDecimal::from(-150));
        assert_eq!(summary.profit_margin, BigDecimal::from(0));
        assert_eq!(summary.expense_by_category.len(), 1);
        assert_eq!(
            summary.expense_by_category.get(ExpenseCategory::Seeds),
            Some(&BigDecimal::from(150))
        );
    }

    #[test]
    fn test_margin_with_revenue() {
        let expenses = vec![expense("1", "1", 300, ExpenseCategory::Fuel, date(2024, 6, 3))];
        let revenues = vec![revenue("r1", "1", 100, 4, date(2024, 6, 20))];
        let scope = ReportScope::new(date(2024, 6, 1), date(2024, 6, 30));

        let summary = compute_profit_loss(&expenses, &revenues, &scope);

        assert_eq!(summary.total_revenue, BigDecimal::from(400));
        assert_eq!(summary.net_profit, BigDecimal::from(100));
        assert_eq!(summary.profit_margin, BigDecimal::from(25));
        assert!(summary.is_profitable());
    }

    #[test]
    fn test_margin_is_rounded_to_two_places() {
        let third = profit_margin(&BigDecimal::from(100), &BigDecimal::from(300));
        assert_eq!(third, "33.33".parse::<BigDecimal>().unwrap());

        let loss = profit_margin(&BigDecimal::from(-200), &BigDecimal::from(300));
        assert_eq!(loss, "-66.67".parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn test_stale_stored_revenue_total_is_ignored() {
        let mut stale = revenue("r1", "1", 10, 3, date(2024, 6, 20));
        stale.total_revenue = BigDecimal::from(99999);
        let scope = ReportScope::new(date(2024, 6, 1), date(2024, 6, 30));

        let summary = compute_profit_loss(&[], &[stale], &scope);
        assert_eq!(summary.total_revenue, BigDecimal::from(30));
    }

    #[test]
    fn test_categories_keep_first_seen_order() {
        let on = date(2024, 3, 10);
        let expenses = vec![
            expense("1", "1", 40, ExpenseCategory::Fuel, on),
            expense("2", "1", 60, ExpenseCategory::Seeds, on),
            expense("3", "1", 10, ExpenseCategory::Fuel, on),
        ];
        let scope = ReportScope::month_of(on);

        let summary = compute_profit_loss(&expenses, &[], &scope);

        assert_eq!(
            summary.expense_by_category.categories(),
            vec![ExpenseCategory::Fuel, ExpenseCategory::Seeds]
        );
        assert_eq!(summary.expense_by_category.total(), summary.total_expenses);
        assert_eq!(
            summary.expense_by_category.get(ExpenseCategory::Fuel),
            Some(&BigDecimal::from(50))
        );
    }

    #[test]
    fn test_breakdown_serializes_as_ordered_object() {
        let mut breakdown = CategoryBreakdown::new();
        breakdown.add(ExpenseCategory::Labor, &BigDecimal::from(5));
        breakdown.add(ExpenseCategory::Equipment, &BigDecimal::from(7));

        let json = serde_json::to_string(&breakdown).unwrap();
        let labor = json.find("Labor").unwrap();
        let equipment = json.find("Equipment").unwrap();
        assert!(labor < equipment);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["Labor"].is_number());
        assert_eq!(value["Equipment"].as_f64(), Some(7.0));
    }
}
