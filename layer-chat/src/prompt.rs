//! Blocking line input from the terminal.

use std::io::{self, BufRead, Write};

/// Source of interactive answers.
pub trait Prompt {
    /// Show `question` and return the next line, trimmed.
    ///
    /// End of input is an [`io::ErrorKind::UnexpectedEof`] error.
    fn line(&mut self, question: &str) -> io::Result<String>;
}

/// Reads from stdin, writing questions to stdout.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn line(&mut self, question: &str) -> io::Result<String> {
        println!("{question}");
        io::stdout().flush()?;
        read_answer(&mut io::stdin().lock())
    }
}

fn read_answer(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}
