use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static FRAME_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^img_\d{9}_Default_000\.tif$").expect("frame name pattern is valid")
});

/// Counts the files in `dir` that look like frames of the image sequence.
/// A missing or unreadable directory counts as zero frames.
pub fn count_frames(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| FRAME_NAME.is_match(name))
        })
        .count()
}
