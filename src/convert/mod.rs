//! Tree conversion: one depth-first, order-preserving walk over a validated
//! NeXus tree, producing the description document the file-writer consumes.
//!
//! The walk composes the submodules: dtype canonicalization and truncation
//! per dataset/attribute, attribute projection per node, stream resolution
//! per group. A node the data layer cannot read becomes an empty placeholder
//! in its position; the rest of the tree is unaffected.

pub mod attrs;
pub mod dtype;
pub mod stream;
pub mod truncate;

pub use stream::StreamMode;

use crate::describe::{DatasetMeta, Description, DescriptionNode};
use crate::tree::{DType, Dataset, Group, Node, Tree};

/// Per-conversion configuration, threaded explicitly into every call; the
/// converter keeps no state between conversions.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub truncate_large_datasets: bool,
    /// Dimensions larger than this are cut down when truncation is on.
    pub large: u64,
    pub streams: StreamMode,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            truncate_large_datasets: false,
            large: truncate::DEFAULT_LARGE,
            streams: StreamMode::Automatic,
        }
    }
}

/// Convert a whole tree. Infallible by design: per-node failures degrade to
/// placeholders rather than aborting the conversion.
pub fn convert_tree(tree: &Tree, config: &ConvertConfig) -> Description {
    Description {
        children: convert_children(&tree.children, None, config),
    }
}

fn convert_children(
    children: &[Node],
    parent_name: Option<&str>,
    config: &ConvertConfig,
) -> Vec<DescriptionNode> {
    children
        .iter()
        .filter(|child| match child {
            Node::Group(g) => !stream::is_facility_private(&g.class),
            Node::Dataset(_) => true,
        })
        .map(|child| convert_node(child, parent_name, config))
        .collect()
}

fn convert_node(node: &Node, parent_name: Option<&str>, config: &ConvertConfig) -> DescriptionNode {
    let built = match node {
        Node::Group(g) => convert_group(g, parent_name, config),
        Node::Dataset(d) => convert_dataset(d, config),
    };
    built.unwrap_or(DescriptionNode::Empty {})
}

fn convert_group(
    group: &Group,
    parent_name: Option<&str>,
    config: &ConvertConfig,
) -> anyhow::Result<DescriptionNode> {
    let children = match stream::resolve(&config.streams, group, parent_name) {
        // The group shell is kept so the output still names the branch; the
        // literal subtree is discarded.
        Some(descriptor) => vec![DescriptionNode::Stream { stream: descriptor }],
        None => convert_children(&group.children, Some(&group.name), config),
    };

    Ok(DescriptionNode::Group {
        name: group.name.clone(),
        children,
        attributes: attrs::project_attributes(Some(&group.class), &group.attributes, config)?,
    })
}

fn convert_dataset(dataset: &Dataset, config: &ConvertConfig) -> anyhow::Result<DescriptionNode> {
    let (values, size) = if config.truncate_large_datasets {
        let bounded = truncate::bounded_shape(&dataset.shape, config.large);
        (truncate::truncate_values(&dataset.values, &bounded), bounded)
    } else {
        (dataset.values.clone(), dataset.shape.clone())
    };

    let values = match dataset.dtype {
        DType::String => dtype::decode_text(&values, size.len())?,
        DType::Object => values,
        _ => {
            dtype::check_rank(&values, size.len())?;
            values
        }
    };

    Ok(DescriptionNode::Dataset {
        name: dataset.name.clone(),
        dataset: DatasetMeta {
            dtype: dtype::canonical_type(dataset.dtype).to_string(),
            size: (!dataset.shape.is_empty()).then_some(size),
        },
        values,
        attributes: attrs::project_attributes(None, &dataset.attributes, config)?,
    })
}
