use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use crate::config::{EncoderConfig, VIDEO_EXTENSION};
use crate::error::{Error, Result};
use crate::ffmpeg::{self, CommandRunner, Outcome};
use crate::source::EncodedMovie;

/// The joined movie and how the encoder exited while writing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConcatResult {
    pub output: PathBuf,
    pub outcome: Outcome,
}

/// `<first>_<second>.m4v`
pub fn output_name(first: &EncodedMovie, second: &EncodedMovie) -> String {
    format!("{}_{}.{}", first.folder_name, second.folder_name, VIDEO_EXTENSION)
}

pub fn unix_timestamp() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|_| Error::Clock)
}

/// Concat demuxer list on disk. The file is removed when this value drops.
#[derive(Debug)]
pub struct ConcatManifest {
    path: PathBuf,
}

impl ConcatManifest {
    /// Writes `file '<path>'` lines for `movies` to `<dir>/<stamp>`. An existing
    /// file with that name is overwritten.
    pub fn create(dir: &Path, stamp: u64, movies: &[&EncodedMovie]) -> Result<Self> {
        let path = dir.join(stamp.to_string());
        let contents = movies
            .iter()
            .map(|movie| format!("file '{}'", quote(&movie.output_file_path)))
            .collect::<Vec<_>>()
            .join("\n");

        fs::write(&path, contents).map_err(|source| Error::Manifest {
            path: path.clone(),
            source,
        })?;
        debug!("wrote concat manifest {}", path.display());

        Ok(ConcatManifest { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ConcatManifest {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!("could not remove {}: {}", self.path.display(), err);
        }
    }
}

// Inside a quoted concat-list entry a single quote has to leave the quotes.
fn quote(path: &str) -> String {
    path.replace('\'', r"'\''")
}

/// Joins `first` and `second` without re-encoding into the working directory.
pub fn concatenate<R: CommandRunner>(
    config: &EncoderConfig,
    runner: &mut R,
    first: &EncodedMovie,
    second: &EncodedMovie,
) -> Result<ConcatResult> {
    let output = config.working_dir.join(output_name(first, second));
    let stamp = unix_timestamp()?;
    let manifest = ConcatManifest::create(&config.working_dir, stamp, &[first, second])?;

    let invocation = ffmpeg::concat_invocation(config, manifest.path(), &output);
    let outcome = runner.run(&invocation)?;
    drop(manifest);

    if outcome.success() {
        info!("Successfully merged files into {}", output.display());
    }
    Ok(ConcatResult { output, outcome })
}
