//! Operator confirmation before reusing an existing work directory.

use std::io::{self, BufRead, Write};

/// Answers a yes/no question. `Ok(false)` aborts the run.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        (**self).confirm(question)
    }
}

/// Line-oriented prompt: accepts exactly `y` or `n` followed by a newline
/// and asks again on anything else. End of input counts as `n`.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        writeln!(self.output, "{question}")?;
        loop {
            writeln!(self.output, "Continue [y/n] ")?;
            self.output.flush()?;

            let mut response = String::new();
            if self.input.read_line(&mut response)? == 0 {
                return Ok(false);
            }
            match response.as_str() {
                "y\n" => return Ok(true),
                "n\n" => return Ok(false),
                _ => continue,
            }
        }
    }
}

/// Non-interactive provider that answers yes to every question.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        println!("{question} (assuming yes)");
        Ok(true)
    }
}
