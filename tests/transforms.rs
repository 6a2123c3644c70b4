use netsuite_workbench::transform::{Transform, apply_named};
use proptest::prelude::*;

#[test]
fn boolean_tf_maps_known_tokens_only() {
    let cases = [
        ("Y", "T"),
        ("yes", "T"),
        ("1", "T"),
        ("True", "T"),
        ("t", "T"),
        ("0", "F"),
        ("N", "F"),
        ("no", "F"),
        ("false", "F"),
        ("maybe", "maybe"),
        ("", ""),
    ];
    for (input, expected) in cases {
        assert_eq!(Transform::BooleanTf.apply(input), expected, "{input:?}");
    }
}

#[test]
fn date_transforms_leave_unparseable_values_alone() {
    assert_eq!(apply_named("date-mm/dd/yyyy", "not a date"), "not a date");
    assert_eq!(apply_named("date-mm/dd/yyyy", "2024-02-29"), "02/29/2024");
    assert_eq!(apply_named("date-yyyy-mm-dd", "Feb 29, 2024"), "2024-02-29");
}

#[test]
fn number_clean_keeps_digits_dots_and_minus() {
    assert_eq!(apply_named("number-clean", "USD -1,234.56"), "-1234.56");
    assert_eq!(apply_named("number-clean", "n/a"), "");
}

proptest! {
    #[test]
    fn every_transform_is_total(value in any::<String>()) {
        for transform in Transform::ALL {
            let _ = transform.apply(&value);
        }
        prop_assert_eq!(Transform::None.apply(&value), value.clone());
        prop_assert_eq!(apply_named("no-such-transform", &value), value.clone());
        prop_assert_eq!(Transform::Trim.apply(&value), value.trim());
    }
}
