use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Extension given to every movie this tool writes.
pub const VIDEO_EXTENSION: &str = "m4v";

#[derive(Parser, Debug)]
#[command(
    name = "tiff2movie",
    version,
    about = "Turn Micro-Manager TIFF sequences into movies and optionally join two of them"
)]
pub struct Cli {
    /// Acquisition folders (each holding a Pos0 directory of TIFF frames)
    #[arg(required = true, num_args = 1..=2, value_name = "FOLDER")]
    pub folders: Vec<String>,

    /// Encoder executable
    #[arg(long, default_value = "ffmpeg")]
    pub encoder: PathBuf,

    #[arg(long, default_value_t = 30)]
    pub frame_rate: u32,

    /// Encoder threads
    #[arg(long, default_value_t = 2)]
    pub threads: u32,

    #[arg(long, default_value = "yuv420p")]
    pub pix_fmt: String,

    /// Directory for the joined movie and the concat manifest [default: current directory]
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Folder separator used to split the given paths
    #[arg(long, default_value_t = std::path::MAIN_SEPARATOR)]
    pub separator: char,

    /// Do not ask the encoder for a report file
    #[arg(long)]
    pub no_report: bool,

    /// What to do when the encoder exits with a non-zero status
    #[arg(long, value_enum, default_value_t = FailurePolicy::Continue)]
    pub on_encode_failure: FailurePolicy,

    /// Accept the default answer for every question instead of reading stdin
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Keep going with the next step
    #[default]
    Continue,
    /// Stop the run
    Abort,
}

#[derive(Clone, Debug)]
pub struct EncoderConfig {
    pub encoder_path: PathBuf,
    pub frame_rate: u32,
    pub thread_count: u32,
    pub pixel_format: String,
    pub working_dir: PathBuf,
    pub separator: char,
    pub report: bool,
    pub on_encode_failure: FailurePolicy,
}

impl EncoderConfig {
    pub fn from_cli(cli: &Cli, cwd: PathBuf) -> Self {
        EncoderConfig {
            encoder_path: cli.encoder.clone(),
            frame_rate: cli.frame_rate,
            thread_count: cli.threads,
            pixel_format: cli.pix_fmt.clone(),
            working_dir: cli.working_dir.clone().unwrap_or(cwd),
            separator: cli.separator,
            report: !cli.no_report,
            on_encode_failure: cli.on_encode_failure,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            encoder_path: PathBuf::from("ffmpeg"),
            frame_rate: 30,
            thread_count: 2,
            pixel_format: "yuv420p".to_string(),
            working_dir: PathBuf::from("."),
            separator: std::path::MAIN_SEPARATOR,
            report: true,
            on_encode_failure: FailurePolicy::Continue,
        }
    }
}
