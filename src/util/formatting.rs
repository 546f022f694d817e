use serde::Serializer;

/// Writes a number as plain decimal with full round-trip precision and no exponent.
pub fn format_decimal(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{}", value)
    }
}

/// For `#[serde(serialize_with = "...")]` on f64 fields.
pub fn serialize_decimal<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_decimal(*value))
}
