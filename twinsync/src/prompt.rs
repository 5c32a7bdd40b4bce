//! Yes/no and free-text questions put to the user

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{Result, SyncError};

/// Source of answers to interactive questions.
///
/// Answering blocks the run; there is no timeout.
pub trait Prompter {
    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn seek_yes(&mut self, message: &str) -> Result<bool>;

    /// Ask for a line of free text.
    fn seek_string(&mut self, message: &str) -> Result<String>;
}

/// Prompts on a writer and reads answers line by line from a reader
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the process's terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}").map_err(SyncError::Prompt)?;
        self.output.flush().map_err(SyncError::Prompt)?;

        let mut line = String::new();
        self.input.read_line(&mut line).map_err(SyncError::Prompt)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn seek_yes(&mut self, message: &str) -> Result<bool> {
        let answer = self.ask(&format!("{message} [y/N]? "))?;
        Ok(answer == "y" || answer == "Y")
    }

    fn seek_string(&mut self, message: &str) -> Result<String> {
        let answer = self.ask(message)?;
        Ok(answer.trim().to_string())
    }
}

/// Answers from a prepared script and remembers every question asked.
///
/// Yes/no questions beyond the end of the script are answered no, unless
/// the prompter was built with [`ScriptedPrompter::always_yes`].
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    strings: VecDeque<String>,
    fallback: bool,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Answer every yes/no question with yes, however many are asked.
    pub fn always_yes() -> Self {
        Self {
            fallback: true,
            ..Self::default()
        }
    }

    pub fn with_strings(mut self, strings: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.strings = strings.into_iter().map(Into::into).collect();
        self
    }

    /// Messages of every question asked so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn seek_yes(&mut self, message: &str) -> Result<bool> {
        self.asked.push(message.to_string());
        Ok(self.answers.pop_front().unwrap_or(self.fallback))
    }

    fn seek_string(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        Ok(self.strings.pop_front().unwrap_or_default())
    }
}
