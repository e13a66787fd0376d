use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// Source of answers to the yes/no questions asked during a run.
pub trait Confirm {
    /// Shows `question` and returns the raw answer without its line ending.
    fn ask(&mut self, question: &str) -> Result<String>;
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
    fn ask(&mut self, question: &str) -> Result<String> {
        (**self).ask(question)
    }
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn ask(&mut self, question: &str) -> Result<String> {
        (**self).ask(question)
    }
}

/// Only a blank answer, `Y` or `y` counts as yes. Whitespace is not trimmed.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer, "" | "Y" | "y")
}

pub fn confirm<C: Confirm + ?Sized>(provider: &mut C, question: &str) -> Result<bool> {
    Ok(is_affirmative(&provider.ask(question)?))
}

/// Reads one line per question from `input`, printing the question to `output`.
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LineConfirm { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::PromptClosed);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

/// Answers every question with the default (blank) answer.
pub struct AssumeDefault;

impl Confirm for AssumeDefault {
    fn ask(&mut self, question: &str) -> Result<String> {
        println!("{question}");
        Ok(String::new())
    }
}
