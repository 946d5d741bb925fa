use anyhow::Context;
use clap::{Parser, Subcommand};

mod command;
mod convert;
mod describe;
mod tree;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "nexus-describe")]
#[command(about = "NeXus structure description and file-writer command generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a JSON structure description of a NeXus tree.
    ///
    /// Without truncation the output can easily be many times the size of
    /// the source data; use --truncate for preview/test documents.
    Describe {
        /// Tree document (tree.json) describing the NeXus structure.
        #[arg(long)]
        tree: String,

        #[arg(short = 'o', long)]
        out: String,

        /// Explicit stream map (streams.json); automatic detection when absent.
        #[arg(long)]
        streams: Option<String>,

        /// Bound every dataset dimension to --large elements.
        #[arg(long)]
        truncate: bool,

        #[arg(long, default_value_t = convert::truncate::DEFAULT_LARGE)]
        large: u64,
    },

    /// Generate a paired start/stop command for the file-writer.
    StartStop {
        #[arg(long)]
        tree: String,

        /// File name the writer should produce.
        #[arg(long)]
        filename: String,

        #[arg(long, default_value = "localhost:9092")]
        broker: String,

        #[arg(long)]
        streams: Option<String>,

        #[arg(long)]
        job_id: Option<String>,

        /// Milliseconds since the unix epoch.
        #[arg(long)]
        start_time: Option<i64>,

        #[arg(long)]
        stop_time: Option<i64>,

        /// Output path for the start command.
        #[arg(short = 'o', long)]
        out: String,

        /// Output path for the stop command (skipped when absent).
        #[arg(long)]
        stop_out: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Describe {
            tree,
            out,
            streams,
            truncate,
            large,
        } => {
            let tree = load_tree(&tree)?;
            let config = convert::ConvertConfig {
                truncate_large_datasets: truncate,
                large,
                streams: load_stream_mode(streams.as_deref())?,
            };

            let description = convert::convert_tree(&tree, &config);
            write_json(&out, &description)?;
        }

        Commands::StartStop {
            tree,
            filename,
            broker,
            streams,
            job_id,
            start_time,
            stop_time,
            out,
            stop_out,
        } => {
            let tree = load_tree(&tree)?;
            // Writer commands always carry the full data; truncation is a
            // preview-only concern.
            let config = convert::ConvertConfig {
                streams: load_stream_mode(streams.as_deref())?,
                ..convert::ConvertConfig::default()
            };

            let description = convert::convert_tree(&tree, &config);
            let (write_cmd, stop_cmd) = command::create_writer_commands(
                description,
                &command::CommandConfig {
                    broker,
                    file_name: filename,
                    job_id,
                    start_time,
                    stop_time,
                },
            );

            write_json(&out, &write_cmd)?;
            if let Some(stop_out) = stop_out {
                write_json(&stop_out, &stop_cmd)?;
            }
        }
    }

    Ok(())
}

fn load_tree(path: &str) -> Result<tree::Tree> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read tree file {}", path))?;
    let spec: tree::TreeSpec =
        serde_json::from_str(&text).with_context(|| format!("parse tree file {}", path))?;
    spec.validate_and_build()
}

fn load_stream_mode(path: Option<&str>) -> Result<convert::StreamMode> {
    match path {
        None => Ok(convert::StreamMode::Automatic),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read stream map {}", path))?;
            let map = serde_json::from_str(&text)
                .with_context(|| format!("parse stream map {}", path))?;
            Ok(convert::StreamMode::Explicit(map))
        }
    }
}

fn write_json<T: serde::Serialize>(path: &str, value: &T) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    println!("Wrote {}", path);
    Ok(())
}
