//! Attribute projection: a node's class name and native attributes become an
//! ordered list of typed attribute records.

use crate::convert::ConvertConfig;
use crate::convert::dtype::{canonical_type, check_rank, decode_text};
use crate::convert::truncate::{bounded_shape, truncate_values};
use crate::describe::AttributeRecord;
use crate::tree::{Attribute, DType};
use serde_json::Value;

/// Classes that never get a synthesized NX_class attribute: the default
/// dataset class and the generic group class.
const GENERIC_CLASSES: [&str; 2] = ["NXfield", "NXgroup"];

/// Project a node's attributes.
///
/// A non-generic class synthesizes a leading `NX_class` record with no type.
/// When the node has native attributes the list is rebuilt from those alone,
/// matching the behavior of the system the file-writer was built against.
/// Returns `None` when nothing is emitted.
pub fn project_attributes(
    class: Option<&str>,
    attributes: &[Attribute],
    config: &ConvertConfig,
) -> anyhow::Result<Option<Vec<AttributeRecord>>> {
    let mut records = Vec::new();

    if let Some(class) = class {
        if !class.is_empty() && !GENERIC_CLASSES.contains(&class) {
            records.push(AttributeRecord {
                name: "NX_class".to_string(),
                values: Value::String(class.to_string()),
                dtype: None,
            });
        }
    }

    if !attributes.is_empty() {
        records.clear();
        for attr in attributes {
            records.push(project_one(attr, config)?);
        }
    }

    Ok((!records.is_empty()).then_some(records))
}

fn project_one(attr: &Attribute, config: &ConvertConfig) -> anyhow::Result<AttributeRecord> {
    let (values, shape) = if config.truncate_large_datasets {
        let bounded = bounded_shape(&attr.shape, config.large);
        (truncate_values(&attr.values, &bounded), bounded)
    } else {
        (attr.values.clone(), attr.shape.clone())
    };

    let values = match attr.dtype {
        DType::String => decode_text(&values, shape.len())?,
        DType::Object => values,
        _ => {
            check_rank(&values, shape.len())?;
            values
        }
    };

    let type_name = canonical_type(attr.dtype);
    Ok(AttributeRecord {
        name: attr.name.clone(),
        values,
        dtype: (type_name != "object").then(|| type_name.to_string()),
    })
}
