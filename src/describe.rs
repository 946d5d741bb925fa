//! Output description document, shaped for the file-writer service.
//!
//! Wire format (internally tagged by "type"):
//! - group:   { "type": "group", "name": ..., "children": [...], "attributes"?: [...] }
//! - dataset: { "type": "dataset", "name": ..., "dataset": { "type": ..., "size"?: [...] },
//!              "values": ..., "attributes"?: [...] }
//! - stream:  { "type": "stream", "stream": { "writer_module": ..., "topic": ...,
//!              "source": ..., "dtype"?: ... } }
//! - empty:   {}  (substituted for a node the data layer could not read)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level description document: `{ "children": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub children: Vec<DescriptionNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DescriptionNode {
    Group {
        name: String,
        children: Vec<DescriptionNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        attributes: Option<Vec<AttributeRecord>>,
    },
    Dataset {
        name: String,
        dataset: DatasetMeta,
        values: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        attributes: Option<Vec<AttributeRecord>>,
    },
    Stream {
        stream: StreamSpec,
    },
    /// Placeholder for an unreadable node; serializes as `{}`.
    #[serde(untagged)]
    Empty {},
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetMeta {
    #[serde(rename = "type")]
    pub dtype: String,
    /// Present iff the dataset is not scalar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec<u64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRecord {
    pub name: String,
    pub values: Value,
    /// Omitted when the canonical type is opaque ("object").
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dtype: Option<String>,
}

/// Descriptor for a branch populated from a live message-bus stream.
/// Also the value type of an explicit stream map (streams.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSpec {
    pub writer_module: String,
    pub topic: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtype: Option<String>,
}
