use std::borrow::Cow;

use crate::data::parse_loose_date;

pub fn lowercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_uppercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_lowercase())
    }
}

pub fn uppercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_lowercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_uppercase())
    }
}

pub fn trim(input: &str) -> Cow<'_, str> {
    Cow::Borrowed(input.trim())
}

/// Reformats a parseable date with `pattern`; anything else passes through untouched.
pub fn reformat_date<'a>(input: &'a str, pattern: &str) -> Cow<'a, str> {
    match parse_loose_date(input) {
        Some(parsed) => Cow::Owned(parsed.format(pattern).to_string()),
        None => Cow::Borrowed(input),
    }
}

pub fn number_clean(input: &str) -> Cow<'_, str> {
    if input
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'))
    {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(
            input
                .chars()
                .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'))
                .collect(),
        )
    }
}

/// Maps truthy tokens to `T` and falsy tokens to `F`; others pass through.
pub fn boolean_tf(input: &str) -> Cow<'_, str> {
    let lowered = input.trim().to_lowercase();
    match lowered.as_str() {
        "yes" | "y" | "1" | "true" | "t" => Cow::Borrowed("T"),
        "no" | "n" | "0" | "false" | "f" => Cow::Borrowed("F"),
        _ => Cow::Borrowed(input),
    }
}
