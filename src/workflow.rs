use tracing::{info, warn};

use crate::concat::{self, ConcatResult};
use crate::config::{EncoderConfig, FailurePolicy};
use crate::error::{Error, Result};
use crate::ffmpeg::{self, CommandRunner, Outcome};
use crate::frames;
use crate::prompt::{self, Confirm};
use crate::source::{EncodedMovie, MovieSource};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeResult {
    pub movie: EncodedMovie,
    pub outcome: Outcome,
}

/// Everything a run produced, in the order it happened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub encoded: Vec<EncodeResult>,
    pub concatenated: Option<ConcatResult>,
}

pub struct Workflow<'a, R, C> {
    config: &'a EncoderConfig,
    runner: R,
    confirm: C,
}

impl<'a, R: CommandRunner, C: Confirm> Workflow<'a, R, C> {
    pub fn new(config: &'a EncoderConfig, runner: R, confirm: C) -> Self {
        Workflow {
            config,
            runner,
            confirm,
        }
    }

    /// Encodes `first`, or with `second` present encodes both and offers to
    /// join them.
    pub fn run(&mut self, first: &str, second: Option<&str>) -> Result<RunReport> {
        let first = MovieSource::parse(first, self.config.separator);

        let Some(second) = second else {
            println!("Converting...\n");
            let encoded = self.encode(&first)?;
            return Ok(RunReport {
                encoded: vec![encoded],
                concatenated: None,
            });
        };
        let second = MovieSource::parse(second, self.config.separator);

        let (first, second) = self.order(first, second)?;

        println!("Converting...\n");
        println!("Converting first movie...");
        let first = self.encode(&first)?;
        println!("Converting second movie...");
        let second = self.encode(&second)?;

        let mut report = RunReport::default();
        if prompt::confirm(&mut self.confirm, "Concatenate these two: Y/n > ")? {
            println!("Concatenating movies...");
            let result =
                concat::concatenate(self.config, &mut self.runner, &first.movie, &second.movie)?;
            if !result.outcome.success() {
                let notice = format!(
                    "joining into {} failed with exit code {:?}",
                    result.output.display(),
                    result.outcome.code
                );
                warn!("{}", notice);
                println!("{}", notice);
            }
            report.concatenated = Some(result);
        }
        report.encoded = vec![first, second];

        println!("All done. Goodbye.\n");
        Ok(report)
    }

    /// Asks whether `first` then `second` is the right order and swaps them
    /// unless the answer is affirmative.
    pub fn order(
        &mut self,
        first: MovieSource,
        second: MovieSource,
    ) -> Result<(MovieSource, MovieSource)> {
        let question = format!(
            "Will join {} with {}. That's OK? Y/n > ",
            first.folder_name(),
            second.folder_name()
        );
        if prompt::confirm(&mut self.confirm, &question)? {
            return Ok((first, second));
        }

        println!(
            "Will join {} with {}.",
            second.folder_name(),
            first.folder_name()
        );
        Ok((second, first))
    }

    /// Runs the encoder over one TIFF sequence. A non-zero exit is handled
    /// according to the configured [`FailurePolicy`].
    pub fn encode(&mut self, source: &MovieSource) -> Result<EncodeResult> {
        println!("{}, path:{}", source.folder_name(), source.base_path());

        let frames_dir = self.config.working_dir.join(source.frames_dir());
        match frames::count_frames(&frames_dir) {
            0 => warn!("no frames found in {}", frames_dir.display()),
            n => info!("{} frames in {}", n, frames_dir.display()),
        }

        let invocation = ffmpeg::encode_invocation(self.config, source);
        let outcome = self.runner.run(&invocation)?;
        let movie = EncodedMovie::from(source);

        if !outcome.success() {
            match self.config.on_encode_failure {
                FailurePolicy::Continue => {
                    let notice = format!(
                        "encoding {} failed with exit code {:?}, continuing",
                        movie.folder_name, outcome.code
                    );
                    warn!("{}", notice);
                    println!("{}", notice);
                }
                FailurePolicy::Abort => {
                    return Err(Error::EncodeAborted {
                        folder: movie.folder_name,
                        code: outcome.code,
                    });
                }
            }
        }

        Ok(EncodeResult { movie, outcome })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::ffmpeg::Invocation;

    /// Hands out canned answers and fails the test on an unexpected question.
    struct Scripted {
        answers: VecDeque<&'static str>,
        asked: Vec<String>,
    }

    impl Scripted {
        fn new(answers: &[&'static str]) -> Self {
            Scripted {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Confirm for Scripted {
        fn ask(&mut self, question: &str) -> Result<String> {
            self.asked.push(question.to_string());
            let answer = self.answers.pop_front();
            Ok(answer.unwrap_or_else(|| panic!("unexpected question: {question}")).to_string())
        }
    }

    /// Exits with the scripted codes in order (0 once they run out) and
    /// remembers whether each concat manifest existed while it ran.
    #[derive(Default)]
    struct Fake {
        codes: VecDeque<i32>,
        calls: Vec<Invocation>,
        manifest_present: Vec<bool>,
    }

    impl Fake {
        fn with_codes(codes: &[i32]) -> Self {
            Fake {
                codes: codes.iter().copied().collect(),
                ..Fake::default()
            }
        }

        fn outputs(&self) -> Vec<&str> {
            self.calls
                .iter()
                .map(|call| call.args.last().unwrap().as_str())
                .collect()
        }
    }

    impl CommandRunner for Fake {
        fn run(&mut self, invocation: &Invocation) -> Result<Outcome> {
            if invocation.args[..2] == ["-f", "concat"] {
                self.manifest_present.push(Path::new(&invocation.args[5]).exists());
            }
            self.calls.push(invocation.clone());
            Ok(Outcome {
                code: Some(self.codes.pop_front().unwrap_or(0)),
            })
        }
    }

    fn config_in(dir: &Path) -> EncoderConfig {
        EncoderConfig {
            working_dir: dir.to_path_buf(),
            separator: '\\',
            ..EncoderConfig::default()
        }
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn single_folder_encodes_once_without_questions() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut fake = Fake::default();
        let mut confirm = Scripted::new(&[]);

        let report = Workflow::new(&config, &mut fake, &mut confirm)
            .run(r"C:\data\expA", None)
            .unwrap();

        assert_eq!(fake.outputs(), [r"C:\data\expA\expA.m4v"]);
        assert!(confirm.asked.is_empty());
        assert_eq!(report.encoded.len(), 1);
        assert_eq!(report.concatenated, None);
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn two_folders_are_encoded_then_joined() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut fake = Fake::default();
        let mut confirm = Scripted::new(&["", "y"]);

        let report = Workflow::new(&config, &mut fake, &mut confirm)
            .run(r"C:\data\expA", Some(r"C:\data\expB"))
            .unwrap();

        assert_eq!(
            confirm.asked,
            [
                "Will join expA with expB. That's OK? Y/n > ",
                "Concatenate these two: Y/n > ",
            ]
        );
        let joined = dir.path().join("expA_expB.m4v");
        assert_eq!(
            fake.outputs(),
            [
                r"C:\data\expA\expA.m4v",
                r"C:\data\expB\expB.m4v",
                joined.to_str().unwrap(),
            ]
        );
        assert_eq!(fake.manifest_present, [true]);
        assert_eq!(report.concatenated.unwrap().output, joined);
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn rejected_order_swaps_sources() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut fake = Fake::default();
        let mut confirm = Scripted::new(&["YES", "Y"]);

        let report = Workflow::new(&config, &mut fake, &mut confirm)
            .run(r"C:\data\expB", Some(r"C:\data\expA"))
            .unwrap();

        let names: Vec<_> = report
            .encoded
            .iter()
            .map(|encoded| encoded.movie.folder_name.as_str())
            .collect();
        assert_eq!(names, ["expA", "expB"]);
        assert_eq!(
            report.concatenated.unwrap().output,
            dir.path().join("expA_expB.m4v")
        );
    }

    #[test]
    fn non_affirmative_answer_skips_concatenation() {
        for answer in ["n", "YES", " ", " y"] {
            let dir = tempfile::tempdir().unwrap();
            let config = config_in(dir.path());
            let mut fake = Fake::default();
            let mut confirm = Scripted::new(&["", answer]);

            let report = Workflow::new(&config, &mut fake, &mut confirm)
                .run(r"C:\data\expA", Some(r"C:\data\expB"))
                .unwrap();

            assert_eq!(fake.calls.len(), 2, "{answer:?}");
            assert_eq!(report.concatenated, None);
            assert!(leftovers(dir.path()).is_empty());
        }
    }

    #[test]
    fn failed_encode_continues_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut fake = Fake::with_codes(&[1, 0, 1]);
        let mut confirm = Scripted::new(&["", ""]);

        let report = Workflow::new(&config, &mut fake, &mut confirm)
            .run(r"C:\data\expA", Some(r"C:\data\expB"))
            .unwrap();

        assert_eq!(fake.calls.len(), 3);
        assert_eq!(report.encoded[0].outcome.code, Some(1));
        assert!(report.encoded[1].outcome.success());
        assert!(!report.concatenated.unwrap().outcome.success());
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn abort_policy_stops_after_failed_encode() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig {
            on_encode_failure: FailurePolicy::Abort,
            ..config_in(dir.path())
        };
        let mut fake = Fake::with_codes(&[2]);
        let mut confirm = Scripted::new(&[""]);

        let err = Workflow::new(&config, &mut fake, &mut confirm)
            .run(r"C:\data\expA", Some(r"C:\data\expB"))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::EncodeAborted { ref folder, code: Some(2) } if folder == "expA"
        ));
        assert_eq!(fake.calls.len(), 1);
    }

    #[test]
    fn relative_folder_keeps_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig {
            separator: '/',
            ..config_in(dir.path())
        };
        let pos0 = dir.path().join("expA").join("Pos0");
        fs::create_dir_all(&pos0).unwrap();
        fs::write(pos0.join("img_000000000_Default_000.tif"), b"").unwrap();
        let mut fake = Fake::default();
        let mut confirm = Scripted::new(&[]);

        let encoded = Workflow::new(&config, &mut fake, &mut confirm)
            .encode(&MovieSource::parse("expA", '/'))
            .unwrap();

        assert_eq!(encoded.movie.output_file_path, "expA/expA.m4v");
        assert_eq!(fake.calls[0].args[6], "expA/Pos0/img_%09d_Default_000.tif");
    }
}
