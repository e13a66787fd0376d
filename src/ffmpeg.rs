use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::config::EncoderConfig;
use crate::error::{Error, Result};
use crate::source::MovieSource;

/// One encoder command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.program, self.args.join(" "))
    }
}

/// Exit status of a finished encoder process. `code` is `None` when the
/// process was killed by a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub code: Option<i32>,
}

impl Outcome {
    pub const SUCCESS: Outcome = Outcome { code: Some(0) };

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    /// Runs `invocation` to completion. Only a failure to start the process is
    /// an error; a non-zero exit comes back as an [`Outcome`].
    fn run(&mut self, invocation: &Invocation) -> Result<Outcome>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, invocation: &Invocation) -> Result<Outcome> {
        (**self).run(invocation)
    }
}

/// Runs the encoder as a blocking child process inside the working directory.
pub struct SystemRunner {
    working_dir: PathBuf,
}

impl SystemRunner {
    pub fn new(working_dir: &Path) -> Self {
        SystemRunner {
            working_dir: working_dir.to_path_buf(),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<Outcome> {
        debug!("Executing: {}", invocation);
        println!("Executing: {}\n=>", invocation);

        // The encoder must not consume answers meant for the prompts.
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| Error::Spawn {
                program: invocation.program.display().to_string(),
                source,
            })?;

        let outcome = Outcome {
            code: status.code(),
        };
        if outcome.success() {
            debug!("{:?} finished", invocation.program);
        } else {
            warn!("{:?} failed with exit code: {}", invocation.program, status);
        }
        Ok(outcome)
    }
}

/// `-framerate N -threads N [-report] -i <frames> -pix_fmt F <output>`
pub fn encode_invocation(config: &EncoderConfig, source: &MovieSource) -> Invocation {
    let mut args = vec![
        "-framerate".to_string(),
        config.frame_rate.to_string(),
        "-threads".to_string(),
        config.thread_count.to_string(),
    ];
    if config.report {
        args.push("-report".to_string());
    }
    args.extend([
        "-i".to_string(),
        source.input_pattern(),
        "-pix_fmt".to_string(),
        config.pixel_format.clone(),
        source.output_path(),
    ]);

    Invocation {
        program: config.encoder_path.clone(),
        args,
    }
}

/// Stream-copy join driven by a concat demuxer list.
pub fn concat_invocation(config: &EncoderConfig, manifest: &Path, output: &Path) -> Invocation {
    Invocation {
        program: config.encoder_path.clone(),
        args: vec![
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            manifest.to_string_lossy().into_owned(),
            "-c".to_string(),
            "copy".to_string(),
            output.to_string_lossy().into_owned(),
        ],
    }
}
