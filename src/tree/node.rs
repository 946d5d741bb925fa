//! In-memory NeXus tree: groups, datasets and their attributes.
//!
//! Whether a node is a group or a dataset is decided once, when the tree is
//! validated, and encoded in the `Node` tagged union. Nothing downstream
//! re-probes for "has children".

use serde::Deserialize;
use serde_json::Value;

/// Native storage type tag, as declared in the tree document.
///
/// `String` stands for fixed-width byte/text storage; `Object` is anything
/// the source system could not represent as a concrete scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
    String,
    Object,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group(Group),
    Dataset(Dataset),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Group(g) => &g.name,
            Node::Dataset(d) => &d.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    /// Slash-separated ancestor names, e.g. "/raw_data_1/sample".
    pub path: String,
    /// NX class name; empty when the document declared none.
    pub class: String,
    pub attributes: Vec<Attribute>,
    /// Declaration order from the source document; order is significant.
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub path: String,
    pub dtype: DType,
    /// Per-dimension sizes; empty means scalar.
    pub shape: Vec<u64>,
    pub values: Value,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub dtype: DType,
    pub shape: Vec<u64>,
    pub values: Value,
}

/// A validated NeXus tree. The root itself is anonymous; only its children
/// appear in generated descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub children: Vec<Node>,
}
