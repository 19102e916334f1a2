//! Operator approval gate between the preview and any write.

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Decides whether a previewed generation may proceed.
pub trait Approver {
    /// Asks `question`; `Ok(true)` lets the writes run.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be obtained.
    fn approve(&mut self, question: &str) -> Result<bool>;
}

/// Reads a `y/N` answer from a line-oriented input.
pub struct TerminalApprover<R, W> {
    input: R,
    output: W,
}

impl TerminalApprover<io::StdinLock<'static>, io::Stdout> {
    /// Prompts on stdout and reads from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalApprover<R, W> {
    /// Creates an approver over arbitrary streams.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Approver for TerminalApprover<R, W> {
    fn approve(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{question} [y/N]: ")?;
        self.output.flush()?;

        let mut answer = String::new();
        // End of input counts as "no".
        self.input.read_line(&mut answer)?;
        let answer = answer.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

/// Approves without asking (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

impl Approver for AutoApprove {
    fn approve(&mut self, _question: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Gives the same answer every time and counts how often it was asked.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer {
    answer: bool,
    asked: usize,
}

impl FixedAnswer {
    /// Creates an approver that always answers `answer`.
    #[must_use]
    pub const fn new(answer: bool) -> Self {
        Self { answer, asked: 0 }
    }

    /// Number of questions received so far.
    #[must_use]
    pub const fn asked(&self) -> usize {
        self.asked
    }
}

impl Approver for FixedAnswer {
    fn approve(&mut self, _question: &str) -> Result<bool> {
        self.asked += 1;
        Ok(self.answer)
    }
}
