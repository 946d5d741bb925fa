//! Tree document (tree.json): raw serde shapes + validation.
//!
//! JSON shape:
//! {
//!   "children": [
//!     {
//!       "name": "entry",
//!       "class": "NXentry",            // optional, defaults to ""
//!       "attributes": [                 // optional, declaration order kept
//!         { "name": "units", "values": "mm", "dtype": "string" }
//!       ],
//!       "children": [
//!         { "name": "title", "dtype": "string", "values": "Test" },
//!         { "name": "counts", "dtype": "int32", "values": [[1,2],[3,4]], "shape": [2,2] }
//!       ]
//!     }
//!   ]
//! }
//!
//! A node with `children` is a group; a node with `dtype` + `values` is a
//! dataset. `shape` and attribute `dtype` are optional and inferred from the
//! JSON literals when absent. Paths ("/entry/title") are computed here and
//! carried on every node for explicit stream-map lookup.

use crate::tree::node::{Attribute, DType, Dataset, Group, Node, Tree};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Deserialize)]
pub struct TreeSpec {
    #[serde(default)]
    pub children: Vec<RawNode>,
}

/// Raw node shape as it appears in tree.json.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNode {
    Group {
        name: String,

        #[serde(default)]
        class: Option<String>,

        #[serde(default)]
        attributes: Vec<RawAttribute>,

        children: Vec<RawNode>,
    },
    Dataset {
        name: String,

        dtype: DType,

        values: Value,

        #[serde(default)]
        shape: Option<Vec<u64>>,

        #[serde(default)]
        attributes: Vec<RawAttribute>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAttribute {
    pub name: String,

    pub values: Value,

    #[serde(default)]
    pub dtype: Option<DType>,
}

impl TreeSpec {
    /// Build a validated tree: unique sibling names, non-empty names, shapes
    /// resolved, paths computed.
    pub fn validate_and_build(&self) -> anyhow::Result<Tree> {
        let children = build_children(&self.children, "")?;
        Ok(Tree { children })
    }
}

fn build_children(raw: &[RawNode], parent_path: &str) -> anyhow::Result<Vec<Node>> {
    use anyhow::bail;

    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for node in raw {
        let built = build_node(node, parent_path)?;
        if !seen.insert(built.name().to_string()) {
            bail!(
                "duplicate sibling name {:?} under {:?}",
                built.name(),
                if parent_path.is_empty() { "/" } else { parent_path }
            );
        }
        out.push(built);
    }
    Ok(out)
}

fn build_node(raw: &RawNode, parent_path: &str) -> anyhow::Result<Node> {
    use anyhow::{Context, bail};

    match raw {
        RawNode::Group {
            name,
            class,
            attributes,
            children,
        } => {
            if name.is_empty() {
                bail!("group with empty name under {:?}", parent_path);
            }
            let path = format!("{}/{}", parent_path, name);
            let children = build_children(children, &path)
                .with_context(|| format!("in group {}", path))?;
            Ok(Node::Group(Group {
                name: name.clone(),
                path,
                class: class.clone().unwrap_or_default(),
                attributes: build_attributes(attributes)?,
                children,
            }))
        }
        RawNode::Dataset {
            name,
            dtype,
            values,
            shape,
            attributes,
        } => {
            if name.is_empty() {
                bail!("dataset with empty name under {:?}", parent_path);
            }
            let path = format!("{}/{}", parent_path, name);
            let shape = match shape {
                Some(s) => {
                    check_declared_shape(*dtype, values, s)
                        .with_context(|| format!("in dataset {}", path))?;
                    s.clone()
                }
                None => infer_shape(*dtype, values),
            };
            Ok(Node::Dataset(Dataset {
                name: name.clone(),
                path,
                dtype: *dtype,
                shape,
                values: values.clone(),
                attributes: build_attributes(attributes)?,
            }))
        }
    }
}

fn build_attributes(raw: &[RawAttribute]) -> anyhow::Result<Vec<Attribute>> {
    raw.iter()
        .map(|a| {
            let dtype = a.dtype.unwrap_or_else(|| infer_dtype(&a.values));
            Ok(Attribute {
                name: a.name.clone(),
                dtype,
                shape: infer_shape(dtype, &a.values),
                values: a.values.clone(),
            })
        })
        .collect()
}

/// Check a declared shape dimension-by-dimension against the actual value
/// nesting, so a description can never carry a `size` that disagrees with
/// its `values`. Leaves follow the same rules as `infer_shape`.
fn check_declared_shape(dtype: DType, values: &Value, shape: &[u64]) -> anyhow::Result<()> {
    use anyhow::bail;

    match shape.split_first() {
        None => match values {
            Value::Array(items)
                if dtype == DType::Object
                    || (dtype == DType::String && items.iter().all(Value::is_u64)) =>
            {
                Ok(())
            }
            Value::Array(items) => bail!(
                "declared shape is scalar but values hold an array of {}",
                items.len()
            ),
            _ => Ok(()),
        },
        Some((dim, rest)) => match values {
            Value::Array(items) => {
                if items.len() as u64 != *dim {
                    bail!(
                        "declared dimension {} does not match {} value elements",
                        dim,
                        items.len()
                    );
                }
                items
                    .iter()
                    .try_for_each(|v| check_declared_shape(dtype, v, rest))
            }
            other => bail!("declared shape has more dimensions than values: {}", other),
        },
    }
}

/// Infer a shape from value nesting. Strings and numbers are leaves; for
/// text data an array of integers is a byte-encoded string, not a dimension.
pub fn infer_shape(dtype: DType, values: &Value) -> Vec<u64> {
    match values {
        Value::Array(items) => {
            if dtype == DType::String && items.iter().all(Value::is_u64) {
                return Vec::new();
            }
            let mut shape = vec![items.len() as u64];
            if let Some(first) = items.first() {
                shape.extend(infer_shape(dtype, first));
            }
            shape
        }
        _ => Vec::new(),
    }
}

/// Infer a native type tag from a JSON literal (attributes may omit dtype).
pub fn infer_dtype(values: &Value) -> DType {
    match values {
        Value::String(_) => DType::String,
        Value::Bool(_) => DType::Bool,
        Value::Number(n) if n.is_f64() => DType::Float64,
        Value::Number(_) => DType::Int64,
        Value::Array(items) => items.first().map(infer_dtype).unwrap_or(DType::Object),
        _ => DType::Object,
    }
}
