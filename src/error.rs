use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to execute {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("could not write concat manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not read answer")]
    Prompt(#[from] io::Error),
    #[error("standard input closed before an answer was given")]
    PromptClosed,
    #[error("system clock is set before the Unix epoch")]
    Clock,
    #[error("encoding {folder} failed (exit code {code:?}), stopping")]
    EncodeAborted { folder: String, code: Option<i32> },
}
