//! Search, filtering, and sorting over record collections
//!
//! A [`FilterQuery`] combines a free-text search, exact-match filters, and
//! inclusive date or numeric ranges; a record must satisfy all of them. The
//! survivors are then sorted with a stable sort, so equal keys keep their
//! insertion order.

pub mod fields;

pub use fields::*;

use std::cmp::Ordering;
use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Farm id → name lookup that never fails
///
/// Ids with no matching farm resolve to the unknown-farm label, the same
/// placeholder the reports use.
#[derive(Debug, Clone)]
pub struct FarmNames<'a> {
    names: HashMap<&'a str, &'a str>,
    unknown_label: &'a str,
}

impl<'a> FarmNames<'a> {
    pub fn new(farms: &'a [Farm], unknown_label: &'a str) -> Self {
        Self {
            names: farms
                .iter()
                .map(|farm| (farm.id.as_str(), farm.name.as_str()))
                .collect(),
            unknown_label,
        }
    }

    /// Farm name for an id, or the unknown-farm label
    pub fn resolve(&self, farm_id: &str) -> &'a str {
        self.names.get(farm_id).copied().unwrap_or(self.unknown_label)
    }
}

/// Records that can be searched, filtered, and sorted
pub trait Filterable {
    /// Text the free-text search looks at
    fn search_fields<'s>(&'s self, farms: &'s FarmNames<'_>) -> Vec<&'s str>;

    /// Value of a named field (snake_case), or `None` if the kind has no such field
    fn field(&self, key: &str, farms: &FarmNames<'_>) -> Option<FieldValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Inclusive bounds on one field; a missing bound is open
#[derive(Debug, Clone, PartialEq)]
pub enum RangeFilter {
    Date {
        field: String,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Number {
        field: String,
        min: Option<BigDecimal>,
        max: Option<BigDecimal>,
    },
}

impl RangeFilter {
    /// Records without the field, or with a value of another kind, fall outside the range
    fn admits<E: Filterable>(&self, record: &E, farms: &FarmNames<'_>) -> bool {
        match self {
            RangeFilter::Date { field, from, to } => record
                .field(&normalize_key(field), farms)
                .and_then(|value| value.as_date())
                .is_some_and(|date| {
                    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
                }),
            RangeFilter::Number { field, min, max } => record
                .field(&normalize_key(field), farms)
                .is_some_and(|value| {
                    value.as_number().is_some_and(|number| {
                        min.as_ref().is_none_or(|min| number >= min)
                            && max.as_ref().is_none_or(|max| number <= max)
                    })
                }),
        }
    }
}

/// Filter parameters, built up fluently
///
/// ```rust
/// use farm_ledger::filter::{FilterQuery, SortDirection};
///
/// let query = FilterQuery::new()
///     .search("corn")
///     .equals("status", "Growing")
///     .sort_by("plantingDate", SortDirection::Descending);
/// assert_eq!(query.equals.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterQuery {
    /// Case-insensitive substring; blank matches everything
    pub search: String,
    /// Field → exact value; a blank value matches everything
    pub equals: Vec<(String, String)>,
    pub ranges: Vec<RangeFilter>,
    /// Sort key; `None` or blank keeps insertion order
    pub sort_key: Option<String>,
    pub direction: SortDirection,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = text.to_string();
        self
    }

    pub fn equals(mut self, field: &str, value: &str) -> Self {
        self.equals.push((field.to_string(), value.to_string()));
        self
    }

    pub fn date_range(
        mut self,
        field: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        self.ranges.push(RangeFilter::Date {
            field: field.to_string(),
            from,
            to,
        });
        self
    }

    pub fn number_range(
        mut self,
        field: &str,
        min: Option<BigDecimal>,
        max: Option<BigDecimal>,
    ) -> Self {
        self.ranges.push(RangeFilter::Number {
            field: field.to_string(),
            min,
            max,
        });
        self
    }

    pub fn sort_by(mut self, key: &str, direction: SortDirection) -> Self {
        self.sort_key = Some(key.to_string());
        self.direction = direction;
        self
    }
}

/// Applies [`FilterQuery`]s against a fixed set of farms
pub struct FilterEngine<'a> {
    farms: FarmNames<'a>,
}

impl<'a> FilterEngine<'a> {
    pub fn new(farms: &'a [Farm], unknown_farm_label: &'a str) -> Self {
        Self {
            farms: FarmNames::new(farms, unknown_farm_label),
        }
    }

    pub fn farm_names(&self) -> &FarmNames<'a> {
        &self.farms
    }

    /// Matching records, sorted; the input is left untouched
    pub fn filter_and_sort<E: Filterable + Clone>(
        &self,
        records: &[E],
        query: &FilterQuery,
    ) -> Vec<E> {
        let needle = query.search.trim().to_lowercase();
        let equals: Vec<(String, &str)> = query
            .equals
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(field, value)| (normalize_key(field), value.as_str()))
            .collect();

        let mut matched: Vec<E> = records
            .iter()
            .filter(|record| self.matches_search(*record, &needle))
            .filter(|record| {
                equals.iter().all(|(field, expected)| {
                    record
                        .field(field, &self.farms)
                        .is_some_and(|value| value.matches(expected))
                })
            })
            .filter(|record| query.ranges.iter().all(|range| range.admits(*record, &self.farms)))
            .cloned()
            .collect();

        if let Some(key) = query.sort_key.as_deref().map(normalize_key) {
            if !key.is_empty() {
                self.sort(&mut matched, &key, query.direction);
            }
        }

        matched
    }

    fn matches_search<E: Filterable>(&self, record: &E, needle: &str) -> bool {
        needle.is_empty()
            || record
                .search_fields(&self.farms)
                .iter()
                .any(|text| text.to_lowercase().contains(needle))
    }

    fn sort<E: Filterable>(&self, records: &mut [E], key: &str, direction: SortDirection) {
        records.sort_by(|a, b| {
            let ordering = match (a.field(key, &self.farms), b.field(key, &self.farms)) {
                (Some(a), Some(b)) => a.compare(&b),
                _ => Ordering::Equal,
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

/// Accept both `dueDate` and `due_date` spellings of a field name
pub fn normalize_key(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len() + 4);
    for c in key.trim().chars() {
        if c.is_ascii_uppercase() {
            if !normalized.is_empty() {
                normalized.push('_');
            }
            normalized.push(c.to_ascii_lowercase());
        } else {
            normalized.push(c);
        }
    }
    normalized
}
