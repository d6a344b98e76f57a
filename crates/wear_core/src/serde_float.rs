//! JSON has no infinities; serde_json writes them as `null`, which reads as
//! "absent". Fields that can legitimately be infinite serialize through here.

use serde::Serializer;

/// Finite values serialize as numbers, `±inf` as `"inf"`/`"-inf"`, NaN as `"nan"`.
#[allow(clippy::trivially_copy_pass_by_ref)] // signature fixed by `serialize_with`
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("nan")
    } else if *value > 0.0 {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Bound {
        #[serde(serialize_with = "super::serialize")]
        value: f64,
    }

    fn to_json(value: f64) -> serde_json::Value {
        serde_json::to_value(Bound { value }).unwrap()["value"].clone()
    }

    #[test]
    fn finite_values_stay_numbers() {
        assert_eq!(to_json(252.5), serde_json::json!(252.5));
    }

    #[test]
    fn non_finite_values_become_strings() {
        assert_eq!(to_json(f64::INFINITY), serde_json::json!("inf"));
        assert_eq!(to_json(f64::NEG_INFINITY), serde_json::json!("-inf"));
        assert_eq!(to_json(f64::NAN), serde_json::json!("nan"));
    }
}
