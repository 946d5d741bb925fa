//! Start/stop command envelopes for the file-writer service.
//!
//! A start command carries the full description document plus broker and
//! output-file metadata; the paired stop command shares its job id so the
//! writer can correlate the two. Optional timestamps are omitted from the
//! wire, never emitted as null.

use crate::describe::Description;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CommandConfig {
    pub broker: String,
    pub file_name: String,
    /// Correlation id; a fresh time-ordered id is generated when unset.
    pub job_id: Option<String>,
    /// Milliseconds since the unix epoch.
    pub start_time: Option<i64>,
    pub stop_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteCommand {
    pub cmd: String,
    pub broker: String,
    pub job_id: String,
    pub file_attributes: FileAttributes,
    pub nexus_structure: Description,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAttributes {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopCommand {
    pub cmd: String,
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_time: Option<i64>,
}

pub fn create_writer_commands(
    structure: Description,
    config: &CommandConfig,
) -> (WriteCommand, StopCommand) {
    let job_id = config
        .job_id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let write = WriteCommand {
        cmd: "FileWriter_new".to_string(),
        broker: config.broker.clone(),
        job_id: job_id.clone(),
        file_attributes: FileAttributes {
            file_name: config.file_name.clone(),
        },
        nexus_structure: structure,
        start_time: config.start_time,
    };
    let stop = StopCommand {
        cmd: "FileWriter_stop".to_string(),
        job_id,
        stop_time: config.stop_time,
    };
    (write, stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config() -> CommandConfig {
        CommandConfig {
            broker: "localhost:9092".to_string(),
            file_name: "out.nxs".to_string(),
            job_id: None,
            start_time: None,
            stop_time: None,
        }
    }

    fn empty_structure() -> Description {
        Description { children: Vec::new() }
    }

    #[test]
    fn generated_job_ids_are_fresh_and_shared_within_a_pair() {
        let (write_a, stop_a) = create_writer_commands(empty_structure(), &config());
        let (write_b, stop_b) = create_writer_commands(empty_structure(), &config());

        assert!(!write_a.job_id.is_empty());
        assert_eq!(write_a.job_id, stop_a.job_id);
        assert_eq!(write_b.job_id, stop_b.job_id);
        assert_ne!(write_a.job_id, write_b.job_id);
    }

    #[test]
    fn supplied_job_id_is_kept_and_empty_means_unset() {
        let (write, stop) = create_writer_commands(
            empty_structure(),
            &CommandConfig {
                job_id: Some("run-42".to_string()),
                ..config()
            },
        );
        assert_eq!(write.job_id, "run-42");
        assert_eq!(stop.job_id, "run-42");

        let (write, _) = create_writer_commands(
            empty_structure(),
            &CommandConfig {
                job_id: Some(String::new()),
                ..config()
            },
        );
        assert!(!write.job_id.is_empty());
    }

    #[test]
    fn timestamps_are_omitted_when_unset() {
        let (write, stop) = create_writer_commands(empty_structure(), &config());
        let write = serde_json::to_value(&write).unwrap();
        let stop = serde_json::to_value(&stop).unwrap();
        assert!(write.get("start_time").is_none());
        assert!(stop.get("stop_time").is_none());
        assert_eq!(write["cmd"], json!("FileWriter_new"));
        assert_eq!(stop["cmd"], json!("FileWriter_stop"));
    }

    #[test]
    fn write_command_wire_shape() {
        let (write, stop) = create_writer_commands(
            empty_structure(),
            &CommandConfig {
                job_id: Some("job-1".to_string()),
                start_time: Some(1_546_300_800_000),
                stop_time: Some(1_546_304_400_000),
                ..config()
            },
        );
        assert_eq!(
            serde_json::to_value(&write).unwrap(),
            json!({
                "cmd": "FileWriter_new",
                "broker": "localhost:9092",
                "job_id": "job-1",
                "file_attributes": { "file_name": "out.nxs" },
                "nexus_structure": { "children": [] },
                "start_time": 1_546_300_800_000_i64
            })
        );
        assert_eq!(
            serde_json::to_value(&stop).unwrap(),
            json!({
                "cmd": "FileWriter_stop",
                "job_id": "job-1",
                "stop_time": 1_546_304_400_000_i64
            })
        );
    }
}
