//! Per-column substring / exact-match filtering.

use maneloca_protocol::{Column, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column needles plus their exact-match flags.
///
/// An absent or empty needle places no constraint on its column. Exact flags
/// are kept even while their column has no needle, so toggling a mode before
/// typing behaves the same as after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    needles: BTreeMap<Column, String>,
    exact: BTreeMap<Column, bool>,
    quick: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_needle(&mut self, column: Column, needle: impl Into<String>) {
        let needle = needle.into();
        if needle.is_empty() {
            self.needles.remove(&column);
        } else {
            self.needles.insert(column, needle);
        }
    }

    pub fn needle(&self, column: Column) -> Option<&str> {
        self.needles.get(&column).map(String::as_str)
    }

    pub fn set_exact(&mut self, column: Column, exact: bool) {
        if exact {
            self.exact.insert(column, true);
        } else {
            self.exact.remove(&column);
        }
    }

    pub fn is_exact(&self, column: Column) -> bool {
        self.exact.get(&column).copied().unwrap_or(false)
    }

    /// Any-field term, applied in addition to the column needles.
    pub fn set_quick(&mut self, term: impl Into<String>) {
        self.quick = term.into();
    }

    pub fn quick(&self) -> Option<&str> {
        if self.quick.is_empty() {
            None
        } else {
            Some(&self.quick)
        }
    }

    /// No needles, no exact flags, no quick term.
    pub fn is_empty(&self) -> bool {
        self.needles.is_empty() && self.exact.is_empty() && self.quick.is_empty()
    }

    /// True when at least one predicate would narrow a record set.
    pub fn is_constraining(&self) -> bool {
        !self.needles.is_empty() || !self.quick.is_empty()
    }

    pub fn clear(&mut self) {
        self.needles.clear();
        self.exact.clear();
        self.quick.clear();
    }

    /// Active `(column, needle, exact)` triples in column order.
    pub fn active(&self) -> impl Iterator<Item = (Column, &str, bool)> + '_ {
        self.needles
            .iter()
            .map(|(column, needle)| (*column, needle.as_str(), self.is_exact(*column)))
    }

    pub fn compile(&self) -> CompiledFilters {
        CompiledFilters {
            columns: self
                .active()
                .map(|(column, needle, exact)| (column, needle.to_lowercase(), exact))
                .collect(),
            quick: self.quick().map(str::to_lowercase),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.compile().matches(record)
    }
}

/// Filter predicates with their needles already lowercased.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    columns: Vec<(Column, String, bool)>,
    quick: Option<String>,
}

impl CompiledFilters {
    pub fn matches(&self, record: &Record) -> bool {
        let columns_pass = self.columns.iter().all(|(column, needle, exact)| {
            let value = record.field_text(*column).to_lowercase();
            if *exact {
                value == *needle
            } else {
                value.contains(needle.as_str())
            }
        });
        if !columns_pass {
            return false;
        }
        match &self.quick {
            Some(term) => Column::ALL
                .iter()
                .any(|column| record.field_text(*column).to_lowercase().contains(term.as_str())),
            None => true,
        }
    }
}

/// Records passing every active predicate, in input order.
pub fn apply_filters<'a, I>(records: I, filters: &FilterState) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let compiled = filters.compile();
    records
        .into_iter()
        .filter(|record| compiled.matches(record))
        .collect()
}
