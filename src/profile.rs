use std::collections::HashSet;

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    data::{
        Row, cell, format_locale_date, format_number, is_blank, parse_finite_number,
        parse_loose_date, strip_numeric_decorations,
    },
    detect::{DetectedColumnType, detect_type},
};

pub const TOP_VALUE_LIMIT: usize = 5;
pub const SAMPLE_VALUE_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueFrequency {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub name: String,
    pub detected_type: DetectedColumnType,
    pub non_null_count: usize,
    pub null_count: usize,
    pub unique_count: usize,
    pub duplicate_count: usize,
    pub min: Option<String>,
    pub max: Option<String>,
    pub top_values: Vec<ValueFrequency>,
    pub sample_values: Vec<String>,
}

impl ColumnProfile {
    pub fn total_count(&self) -> usize {
        self.non_null_count + self.null_count
    }

    pub fn top_values_summary(&self, limit: usize) -> String {
        self.top_values
            .iter()
            .take(limit)
            .map(|freq| format!("{} ({})", freq.value, freq.count))
            .join(", ")
    }
}

/// Profiles every header in order. Rows lacking a header count it as empty.
pub fn profile_columns(headers: &[String], rows: &[Row]) -> Vec<ColumnProfile> {
    let profiles = headers
        .iter()
        .map(|header| {
            let values = rows.iter().map(|row| cell(row, header)).collect::<Vec<_>>();
            profile_column(header, &values)
        })
        .collect::<Vec<_>>();
    debug!(
        "Profiled {} column(s) across {} row(s)",
        profiles.len(),
        rows.len()
    );
    profiles
}

pub fn profile_column(name: &str, values: &[&str]) -> ColumnProfile {
    let non_empty = values
        .iter()
        .copied()
        .filter(|value| !is_blank(value))
        .collect::<Vec<_>>();
    let unique_count = non_empty.iter().collect::<HashSet<_>>().len();
    let detected_type = detect_type(values);
    let (min, max) = min_max(&non_empty, detected_type);

    ColumnProfile {
        name: name.to_string(),
        detected_type,
        non_null_count: non_empty.len(),
        null_count: values.len() - non_empty.len(),
        unique_count,
        duplicate_count: non_empty.len() - unique_count,
        min,
        max,
        top_values: top_values(&non_empty, TOP_VALUE_LIMIT),
        sample_values: non_empty
            .iter()
            .take(SAMPLE_VALUE_LIMIT)
            .map(|value| value.to_string())
            .collect(),
    }
}

fn top_values(non_empty: &[&str], limit: usize) -> Vec<ValueFrequency> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for &value in non_empty {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut items = counts.into_iter().collect::<Vec<_>>();
    // Stable: ties keep first-seen order.
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items
        .into_iter()
        .take(limit)
        .map(|(value, count)| ValueFrequency {
            value: value.to_string(),
            count,
        })
        .collect()
}

fn min_max(non_empty: &[&str], detected: DetectedColumnType) -> (Option<String>, Option<String>) {
    if non_empty.is_empty() {
        return (None, None);
    }
    match detected {
        DetectedColumnType::Number | DetectedColumnType::Currency => {
            let numbers = non_empty
                .iter()
                .filter_map(|value| parse_finite_number(&strip_numeric_decorations(value)))
                .collect::<Vec<_>>();
            let min = numbers.iter().copied().reduce(f64::min);
            let max = numbers.iter().copied().reduce(f64::max);
            (min.map(format_number), max.map(format_number))
        }
        DetectedColumnType::Date => {
            let dates = non_empty
                .iter()
                .filter_map(|value| parse_loose_date(value))
                .collect::<Vec<_>>();
            (
                dates.iter().min().map(format_locale_date),
                dates.iter().max().map(format_locale_date),
            )
        }
        _ => (
            non_empty.iter().min().map(|value| value.to_string()),
            non_empty.iter().max().map(|value| value.to_string()),
        ),
    }
}
