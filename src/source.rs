use crate::config::VIDEO_EXTENSION;

/// Subdirectory Micro-Manager writes the frames of the first position into.
pub const POSITION_DIR: &str = "Pos0";

/// Frame file name, as an encoder image-sequence pattern.
pub const FRAME_PATTERN: &str = "img_%09d_Default_000.tif";

/// A folder of TIFF frames, kept as the path segments it was given as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieSource {
    segments: Vec<String>,
    separator: char,
}

impl MovieSource {
    /// Splits `path` on `separator`. Trailing empty segments (a path ending in
    /// a separator) are dropped; nothing else is checked.
    pub fn parse(path: &str, separator: char) -> Self {
        let mut segments: Vec<String> = path.split(separator).map(str::to_string).collect();
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
        MovieSource {
            segments,
            separator,
        }
    }

    pub fn from_segments<I, S>(segments: I, separator: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MovieSource {
            segments: segments.into_iter().map(Into::into).collect(),
            separator,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Every segment but the last, rejoined.
    pub fn base_path(&self) -> String {
        match self.segments.split_last() {
            Some((_, parents)) => parents.join(&self.separator.to_string()),
            None => String::new(),
        }
    }

    pub fn folder_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// `<base>/<folder>`, the acquisition folder itself.
    pub fn folder_path(&self) -> String {
        self.segments.join(&self.separator.to_string())
    }

    /// `<base>/<folder>/Pos0/`, always with a trailing separator.
    pub fn frames_dir(&self) -> String {
        let mut dir = self.child(POSITION_DIR);
        dir.push(self.separator);
        dir
    }

    /// Image-sequence input handed to the encoder.
    pub fn input_pattern(&self) -> String {
        format!("{}{}", self.frames_dir(), FRAME_PATTERN)
    }

    /// Movie written next to `Pos0`, named after the folder.
    pub fn output_path(&self) -> String {
        self.child(&format!("{}.{}", self.folder_name(), VIDEO_EXTENSION))
    }

    fn child(&self, name: &str) -> String {
        if self.segments.is_empty() {
            return name.to_string();
        }
        format!("{}{}{}", self.folder_path(), self.separator, name)
    }
}

/// What encoding a [`MovieSource`] produced (or was meant to produce).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedMovie {
    pub base_path: String,
    pub output_file_path: String,
    pub folder_name: String,
}

impl From<&MovieSource> for EncodedMovie {
    fn from(source: &MovieSource) -> Self {
        EncodedMovie {
            base_path: source.base_path(),
            output_file_path: source.output_path(),
            folder_name: source.folder_name().to_string(),
        }
    }
}
