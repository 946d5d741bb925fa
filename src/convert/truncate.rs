//! Truncation policy for preview output.
//!
//! Generated description documents embed dataset values verbatim and can
//! easily grow to many times the size of the source file. When truncation is
//! enabled, every dimension larger than `large` is cut down to `large` by
//! taking a prefix slice; rank never changes and no dimension grows.

use serde_json::Value;

/// Dimensions larger than this are considered large.
pub const DEFAULT_LARGE: u64 = 10;

pub fn bounded_shape(shape: &[u64], large: u64) -> Vec<u64> {
    shape.iter().map(|dim| (*dim).min(large)).collect()
}

/// Restrict nested value arrays to `bounded`, slicing a prefix along each
/// dimension. Values deeper than the bounded rank pass through untouched.
pub fn truncate_values(values: &Value, bounded: &[u64]) -> Value {
    match bounded.split_first() {
        None => values.clone(),
        Some((dim, rest)) => match values {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .take(*dim as usize)
                    .map(|v| truncate_values(v, rest))
                    .collect(),
            ),
            other => other.clone(),
        },
    }
}
