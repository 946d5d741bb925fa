//! Stream resolution: decide, per group, whether its subtree is replaced by
//! a message-bus stream descriptor instead of literal data.
//!
//! Explicit mode takes a caller-supplied path map verbatim (the authoring
//! workflow: edit the structural description once, then name the branches to
//! live-feed at acquisition time). Automatic mode detects streamable NX
//! classes from the tree itself.

use crate::convert::dtype::canonical_type;
use crate::describe::StreamSpec;
use crate::tree::{Group, Node};
use std::collections::BTreeMap;

pub const SAMPLE_ENV_TOPIC: &str = "SAMPLE_ENV_TOPIC";
pub const EVENT_DATA_TOPIC: &str = "EVENT_DATA_TOPIC";

/// Chosen once per conversion; never changes mid-traversal.
#[derive(Debug, Clone)]
pub enum StreamMode {
    /// path -> descriptor, taken verbatim on a hit.
    Explicit(BTreeMap<String, StreamSpec>),
    /// Detect NXlog / NXevent_data groups from their class.
    Automatic,
}

/// Groups whose class carries this prefix are facility-internal metadata and
/// are dropped from descriptions entirely.
pub fn is_facility_private(class: &str) -> bool {
    class.starts_with("IX")
}

/// Resolve a group against the stream mode. `None` means the group is
/// converted literally.
pub fn resolve(mode: &StreamMode, group: &Group, parent_name: Option<&str>) -> Option<StreamSpec> {
    match mode {
        StreamMode::Explicit(map) => map.get(&group.path).cloned(),
        StreamMode::Automatic => match group.class.as_str() {
            "NXlog" => resolve_value_log(group, parent_name),
            "NXevent_data" => Some(StreamSpec {
                writer_module: "ev42".to_string(),
                topic: EVENT_DATA_TOPIC.to_string(),
                source: "NeXus-Streamer".to_string(),
                dtype: None,
            }),
            _ => None,
        },
    }
}

fn resolve_value_log(group: &Group, parent_name: Option<&str>) -> Option<StreamSpec> {
    // ISIS files hang the log under a generic "value_log" container; the
    // informative name is the parent group's.
    let source = if group.name == "value_log" {
        parent_name.unwrap_or(group.name.as_str())
    } else {
        group.name.as_str()
    };

    // Without a value dataset to take the type from, the group is not
    // streamable and falls back to literal conversion.
    let dtype = child_dataset_type(group, "value").or_else(|| child_dataset_type(group, "raw_value"))?;

    Some(StreamSpec {
        writer_module: "f142".to_string(),
        topic: SAMPLE_ENV_TOPIC.to_string(),
        source: source.to_string(),
        dtype: Some(dtype.to_string()),
    })
}

fn child_dataset_type(group: &Group, name: &str) -> Option<&'static str> {
    group.children.iter().find_map(|child| match child {
        Node::Dataset(d) if d.name == name => Some(canonical_type(d.dtype)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DType, Dataset};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dataset(name: &str, dtype: DType) -> Node {
        Node::Dataset(Dataset {
            name: name.to_string(),
            path: format!("/{}", name),
            dtype,
            shape: Vec::new(),
            values: json!(0),
            attributes: Vec::new(),
        })
    }

    fn group(name: &str, class: &str, children: Vec<Node>) -> Group {
        Group {
            name: name.to_string(),
            path: format!("/{}", name),
            class: class.to_string(),
            attributes: Vec::new(),
            children,
        }
    }

    #[test]
    fn value_log_takes_its_source_from_the_parent_group() {
        let log = group("value_log", "NXlog", vec![dataset("value", DType::Float32)]);
        let stream = resolve(&StreamMode::Automatic, &log, Some("Sample")).unwrap();
        assert_eq!(
            stream,
            StreamSpec {
                writer_module: "f142".into(),
                topic: SAMPLE_ENV_TOPIC.into(),
                source: "Sample".into(),
                dtype: Some("float".into()),
            }
        );
    }

    #[test]
    fn named_log_uses_its_own_name_and_falls_back_to_raw_value() {
        let log = group(
            "temperature",
            "NXlog",
            vec![dataset("raw_value", DType::Int32)],
        );
        let stream = resolve(&StreamMode::Automatic, &log, Some("Sample")).unwrap();
        assert_eq!(stream.source, "temperature");
        assert_eq!(stream.dtype.as_deref(), Some("int32"));
    }

    #[test]
    fn log_without_value_datasets_is_not_a_stream() {
        let log = group("temperature", "NXlog", vec![dataset("times", DType::Int64)]);
        assert_eq!(resolve(&StreamMode::Automatic, &log, None), None);
    }

    #[test]
    fn event_data_resolves_to_ev42() {
        let events = group("detector_1_events", "NXevent_data", Vec::new());
        let stream = resolve(&StreamMode::Automatic, &events, None).unwrap();
        assert_eq!(stream.writer_module, "ev42");
        assert_eq!(stream.topic, EVENT_DATA_TOPIC);
        assert_eq!(stream.source, "NeXus-Streamer");
        assert_eq!(stream.dtype, None);
    }

    #[test]
    fn explicit_map_matches_on_path_only() {
        let descriptor = StreamSpec {
            writer_module: "f142".into(),
            topic: "motion".into(),
            source: "stage_x".into(),
            dtype: Some("double".into()),
        };
        let mut map = BTreeMap::new();
        map.insert("/entry/stage".to_string(), descriptor.clone());
        let mode = StreamMode::Explicit(map);

        let mut plain = group("stage", "NXpositioner", Vec::new());
        plain.path = "/entry/stage".to_string();
        assert_eq!(resolve(&mode, &plain, None), Some(descriptor));

        // Even an NXlog is converted literally when explicit mode misses.
        let log = group("value_log", "NXlog", vec![dataset("value", DType::Float32)]);
        assert_eq!(resolve(&mode, &log, Some("Sample")), None);
    }

    #[test]
    fn facility_private_prefix() {
        assert!(is_facility_private("IXrunlog"));
        assert!(!is_facility_private("NXlog"));
        assert!(!is_facility_private(""));
    }
}
