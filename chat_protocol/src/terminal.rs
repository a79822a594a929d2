use crossterm::{
    QueueableCommand,
    style::{self, Stylize},
};
use std::io::{self, BufRead, Write};

use crate::display::DisplaySink;
use crate::input::LineSource;

/// Interactive input from the process's stdin.
pub struct StdinLines {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl StdinLines {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinLines {
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.stdout
            .queue(style::PrintStyledContent(style::style(prompt).green()))?;
        self.stdout.flush()?;

        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Prints peer messages and notices to stdout.
pub struct TerminalDisplay {
    stdout: io::Stdout,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self { stdout: io::stdout() }
    }

    fn print_line(&mut self, content: style::StyledContent<&str>) -> io::Result<()> {
        self.stdout
            .queue(style::PrintStyledContent(content))?
            .queue(style::Print("\n"))?;
        self.stdout.flush()
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for TerminalDisplay {
    fn message(&mut self, text: &str) -> io::Result<()> {
        self.print_line(style::style(text).white())
    }

    fn notice(&mut self, text: &str) -> io::Result<()> {
        self.print_line(style::style(text).yellow())
    }
}
