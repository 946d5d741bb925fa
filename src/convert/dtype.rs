//! Type canonicalization: native storage tags to the portable type names the
//! file-writer understands, plus byte-string decoding.
//!
//! Mapping: string -> "string", float64 -> "double", float32 -> "float",
//! integers/bool pass through under their native name, object -> "object"
//! (attributes with an "object" type omit their type field downstream).

use crate::tree::DType;
use anyhow::{Context, bail};
use serde_json::Value;

pub fn canonical_type(dtype: DType) -> &'static str {
    match dtype {
        DType::String => "string",
        DType::Float64 => "double",
        DType::Float32 => "float",
        DType::Int8 => "int8",
        DType::Int16 => "int16",
        DType::Int32 => "int32",
        DType::Int64 => "int64",
        DType::Uint8 => "uint8",
        DType::Uint16 => "uint16",
        DType::Uint32 => "uint32",
        DType::Uint64 => "uint64",
        DType::Bool => "bool",
        DType::Object => "object",
    }
}

/// Decode text data element-wise through the declared rank. A leaf may be a
/// JSON string (already decoded) or an array of bytes, which is decoded as
/// UTF-8 with trailing NUL padding stripped (fixed-width storage pads with
/// zeros).
pub fn decode_text(values: &Value, rank: usize) -> anyhow::Result<Value> {
    if rank == 0 {
        return decode_leaf(values);
    }
    match values {
        Value::Array(items) => Ok(Value::Array(
            items
                .iter()
                .map(|v| decode_text(v, rank - 1))
                .collect::<anyhow::Result<_>>()?,
        )),
        other => bail!("text values do not match declared shape: {}", other),
    }
}

fn decode_leaf(value: &Value) -> anyhow::Result<Value> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Array(items) => {
            let mut bytes = Vec::with_capacity(items.len());
            for item in items {
                let byte = item
                    .as_u64()
                    .filter(|b| *b <= u8::MAX as u64)
                    .with_context(|| format!("byte string element out of range: {}", item))?;
                bytes.push(byte as u8);
            }
            while bytes.last() == Some(&0) {
                bytes.pop();
            }
            let text = String::from_utf8(bytes).context("byte string is not valid UTF-8")?;
            Ok(Value::String(text))
        }
        other => bail!("expected text or byte values, got {}", other),
    }
}

/// Check that non-text values nest exactly as deep as the declared rank.
pub fn check_rank(values: &Value, rank: usize) -> anyhow::Result<()> {
    if rank == 0 {
        if values.is_array() {
            bail!("scalar dataset holds an array value");
        }
        return Ok(());
    }
    match values {
        Value::Array(items) => items.iter().try_for_each(|v| check_rank(v, rank - 1)),
        other => bail!("values do not match declared shape: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn canonical_type_table() {
        assert_eq!(canonical_type(DType::Float64), "double");
        assert_eq!(canonical_type(DType::Float32), "float");
        assert_eq!(canonical_type(DType::String), "string");
        assert_eq!(canonical_type(DType::Int32), "int32");
        assert_eq!(canonical_type(DType::Uint64), "uint64");
        assert_eq!(canonical_type(DType::Bool), "bool");
        assert_eq!(canonical_type(DType::Object), "object");
    }

    #[test]
    fn scalar_byte_string_decodes_with_padding_stripped() {
        assert_eq!(
            decode_text(&json!([84, 101, 115, 116, 0, 0]), 0).unwrap(),
            json!("Test")
        );
    }

    #[test]
    fn string_arrays_decode_element_wise() {
        assert_eq!(
            decode_text(&json!([[104, 105], "there", [33]]), 1).unwrap(),
            json!(["hi", "there", "!"])
        );
    }

    #[test]
    fn already_decoded_scalar_passes_through() {
        assert_eq!(decode_text(&json!("Test"), 0).unwrap(), json!("Test"));
    }

    #[test]
    fn invalid_bytes_are_an_error() {
        assert!(decode_text(&json!([300]), 0).is_err());
        assert!(decode_text(&json!([0xff, 0xfe]), 0).is_err()); // not UTF-8
        assert!(decode_text(&json!(12), 0).is_err());
    }

    #[test]
    fn rank_mismatches_are_an_error() {
        assert!(check_rank(&json!([[1, 2], [3, 4]]), 2).is_ok());
        assert!(check_rank(&json!(5), 0).is_ok());
        assert!(check_rank(&json!([1, 2]), 0).is_err());
        assert!(check_rank(&json!(5), 1).is_err());
        assert!(check_rank(&json!([[1], 2]), 2).is_err());
    }
}
