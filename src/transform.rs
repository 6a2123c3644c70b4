pub mod string_ops;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Trim,
    TrimUppercase,
    TrimLowercase,
    DateMmDdYyyy,
    DateYyyyMmDd,
    NumberClean,
    BooleanTf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransformOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl Transform {
    pub const ALL: [Transform; 10] = [
        Transform::None,
        Transform::Uppercase,
        Transform::Lowercase,
        Transform::Trim,
        Transform::TrimUppercase,
        Transform::TrimLowercase,
        Transform::DateMmDdYyyy,
        Transform::DateYyyyMmDd,
        Transform::NumberClean,
        Transform::BooleanTf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transform::None => "none",
            Transform::Uppercase => "uppercase",
            Transform::Lowercase => "lowercase",
            Transform::Trim => "trim",
            Transform::TrimUppercase => "trim-uppercase",
            Transform::TrimLowercase => "trim-lowercase",
            Transform::DateMmDdYyyy => "date-mm/dd/yyyy",
            Transform::DateYyyyMmDd => "date-yyyy-mm-dd",
            Transform::NumberClean => "number-clean",
            Transform::BooleanTf => "boolean-tf",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Transform::None => "None",
            Transform::Uppercase => "UPPERCASE",
            Transform::Lowercase => "lowercase",
            Transform::Trim => "Trim whitespace",
            Transform::TrimUppercase => "Trim + UPPERCASE",
            Transform::TrimLowercase => "Trim + lowercase",
            Transform::DateMmDdYyyy => "Date MM/DD/YYYY",
            Transform::DateYyyyMmDd => "Date YYYY-MM-DD",
            Transform::NumberClean => "Clean number",
            Transform::BooleanTf => "Boolean T/F",
        }
    }

    /// Resolves a name, falling back to [`Transform::None`] for unknown or empty names.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn apply(&self, value: &str) -> String {
        match self {
            Transform::None => value.to_string(),
            Transform::Uppercase => string_ops::uppercase(value).into_owned(),
            Transform::Lowercase => string_ops::lowercase(value).into_owned(),
            Transform::Trim => string_ops::trim(value).into_owned(),
            Transform::TrimUppercase => string_ops::uppercase(value.trim()).into_owned(),
            Transform::TrimLowercase => string_ops::lowercase(value.trim()).into_owned(),
            Transform::DateMmDdYyyy => string_ops::reformat_date(value, "%m/%d/%Y").into_owned(),
            Transform::DateYyyyMmDd => string_ops::reformat_date(value, "%Y-%m-%d").into_owned(),
            Transform::NumberClean => string_ops::number_clean(value).into_owned(),
            Transform::BooleanTf => string_ops::boolean_tf(value).into_owned(),
        }
    }

    pub fn options() -> Vec<TransformOption> {
        Self::ALL
            .iter()
            .map(|transform| TransformOption {
                value: transform.as_str(),
                label: transform.label(),
            })
            .collect()
    }
}

pub fn apply_named(name: &str, value: &str) -> String {
    Transform::from_name(name).apply(value)
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown transform '{0}'")]
pub struct UnknownTransform(pub String);

impl FromStr for Transform {
    type Err = UnknownTransform;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|transform| transform.as_str() == value)
            .ok_or_else(|| UnknownTransform(value.to_string()))
    }
}

impl Serialize for Transform {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Transform {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(Transform::from_name).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for transform in Transform::ALL {
            assert_eq!(transform.as_str().parse::<Transform>().unwrap(), transform);
        }
    }

    #[test]
    fn options_stay_in_registry_order() {
        let options = Transform::options();
        assert_eq!(options.len(), Transform::ALL.len());
        assert_eq!(options[0].value, "none");
        assert_eq!(options[6].value, "date-mm/dd/yyyy");
        assert_eq!(options[9].label, "Boolean T/F");
    }

    #[test]
    fn unknown_names_fall_back_to_identity() {
        assert_eq!(Transform::from_name("reverse"), Transform::None);
        assert_eq!(Transform::from_name(""), Transform::None);
        assert_eq!(apply_named("reverse", " Keep Me "), " Keep Me ");
    }

    #[test]
    fn case_and_trim_transforms() {
        assert_eq!(Transform::Uppercase.apply(" abc "), " ABC ");
        assert_eq!(Transform::Lowercase.apply("ÀBC"), "àbc");
        assert_eq!(Transform::Trim.apply("\t x \n"), "x");
        assert_eq!(Transform::TrimUppercase.apply("  acme inc "), "ACME INC");
        assert_eq!(Transform::TrimLowercase.apply(" Jane@X.com "), "jane@x.com");
    }

    #[test]
    fn date_transforms_zero_pad() {
        assert_eq!(Transform::DateMmDdYyyy.apply("2024-3-7"), "03/07/2024");
        assert_eq!(Transform::DateYyyyMmDd.apply("3/7/2024"), "2024-03-07");
        assert_eq!(Transform::DateMmDdYyyy.apply("not a date"), "not a date");
        assert_eq!(Transform::DateYyyyMmDd.apply(""), "");
    }

    #[test]
    fn boolean_tf_table() {
        assert_eq!(Transform::BooleanTf.apply("Y"), "T");
        assert_eq!(Transform::BooleanTf.apply("0"), "F");
        assert_eq!(Transform::BooleanTf.apply("maybe"), "maybe");
        assert_eq!(Transform::BooleanTf.apply(" TRUE "), "T");
    }

    #[test]
    fn null_transform_deserializes_to_none() {
        let parsed: Transform = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Transform::None);
        let parsed: Transform = serde_json::from_str("\"trim\"").unwrap();
        assert_eq!(parsed, Transform::Trim);
    }

    #[test]
    fn names_are_matched_exactly() {
        assert_eq!(Transform::from_name("TRIM"), Transform::None);
        assert_eq!(Transform::from_name(" trim"), Transform::None);
        assert!("Uppercase".parse::<Transform>().is_err());
        assert_eq!(apply_named("TRIM", " x "), " x ");
    }
}
