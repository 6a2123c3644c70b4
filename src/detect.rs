use std::{fmt, sync::OnceLock};

use log::trace;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::{parse_finite_number, parse_loose_date};

/// A type wins once this share of non-empty values satisfies it.
pub const DETECTION_THRESHOLD_PERCENT: usize = 80;
/// Share above which a type counts toward a `Mixed` verdict.
pub const MIXED_THRESHOLD_PERCENT: usize = 30;

const BOOLEAN_TOKENS: &[&str] = &["true", "false", "yes", "no", "1", "0", "t", "f", "y", "n"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedColumnType {
    String,
    Number,
    Date,
    Boolean,
    Email,
    Phone,
    Currency,
    Mixed,
}

impl DetectedColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedColumnType::String => "string",
            DetectedColumnType::Number => "number",
            DetectedColumnType::Date => "date",
            DetectedColumnType::Boolean => "boolean",
            DetectedColumnType::Email => "email",
            DetectedColumnType::Phone => "phone",
            DetectedColumnType::Currency => "currency",
            DetectedColumnType::Mixed => "mixed",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DetectedColumnType::Number | DetectedColumnType::Currency
        )
    }
}

impl fmt::Display for DetectedColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9\s()+-]{7,20}$").expect("valid regex"))
}

fn plain_numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9.]+$").expect("valid regex"))
}

fn currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[$€£¥]?\s?[0-9,]+\.?[0-9]*$|^[0-9,]+\.?[0-9]*\s?[$€£¥]$")
            .expect("valid regex")
    })
}

fn date_shape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9]{1,4}[/-][0-9]{1,2}[/-][0-9]{1,4}$").expect("valid regex")
    })
}

pub fn is_boolean_token(value: &str) -> bool {
    let lowered = value.to_lowercase();
    BOOLEAN_TOKENS.contains(&lowered.as_str())
}

pub fn is_email(value: &str) -> bool {
    email_re().is_match(value)
}

/// Digits with phone punctuation, excluding plain numbers such as `1234567` or `3.14`.
pub fn is_phone(value: &str) -> bool {
    phone_re().is_match(value) && !plain_numeric_re().is_match(value)
}

pub fn is_currency(value: &str) -> bool {
    currency_re().is_match(value) && value.contains(['$', '€', '£', '¥'])
}

pub fn is_date(value: &str) -> bool {
    date_shape_re().is_match(value) || parse_loose_date(value).is_some()
}

pub fn is_number(value: &str) -> bool {
    parse_finite_number(value).is_some()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub total: usize,
    pub email: usize,
    pub currency: usize,
    pub phone: usize,
    pub boolean: usize,
    pub date: usize,
    pub number: usize,
}

impl TypeCounts {
    pub fn observe(&mut self, value: &str) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.total += 1;
        if is_boolean_token(trimmed) {
            self.boolean += 1;
        }
        if is_email(trimmed) {
            self.email += 1;
        }
        if is_phone(trimmed) {
            self.phone += 1;
        }
        if is_currency(trimmed) {
            self.currency += 1;
        }
        if is_date(trimmed) {
            self.date += 1;
        }
        if is_number(trimmed) {
            self.number += 1;
        }
    }

    fn prioritized(&self) -> [(DetectedColumnType, usize); 6] {
        [
            (DetectedColumnType::Email, self.email),
            (DetectedColumnType::Currency, self.currency),
            (DetectedColumnType::Phone, self.phone),
            (DetectedColumnType::Boolean, self.boolean),
            (DetectedColumnType::Date, self.date),
            (DetectedColumnType::Number, self.number),
        ]
    }

    fn meets(&self, count: usize, percent: usize) -> bool {
        count.saturating_mul(100) >= self.total.saturating_mul(percent)
    }

    fn exceeds(&self, count: usize, percent: usize) -> bool {
        count.saturating_mul(100) > self.total.saturating_mul(percent)
    }

    pub fn decide(&self) -> DetectedColumnType {
        if self.total == 0 {
            return DetectedColumnType::String;
        }
        let ranked = self.prioritized();
        if let Some((winner, _)) = ranked
            .iter()
            .find(|(_, count)| self.meets(*count, DETECTION_THRESHOLD_PERCENT))
        {
            return *winner;
        }
        let contenders = ranked
            .iter()
            .filter(|(_, count)| self.exceeds(*count, MIXED_THRESHOLD_PERCENT))
            .count();
        if contenders > 1 {
            DetectedColumnType::Mixed
        } else {
            DetectedColumnType::String
        }
    }
}

pub fn detect_type<I, S>(values: I) -> DetectedColumnType
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = TypeCounts::default();
    for value in values {
        counts.observe(value.as_ref());
    }
    let detected = counts.decide();
    trace!("Detected {detected} from {counts:?}");
    detected
}
