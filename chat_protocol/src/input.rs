use std::collections::VecDeque;
use std::io;

use tracing::debug;

use crate::codec::{Handle, MAX_HANDLE_CHARS};
use crate::error::{ChatError, Result};

pub const HANDLE_PROMPT: &str = "Please enter a handle of 10 characters or less: ";

/// Where outgoing text comes from. Lines are returned without their trailing
/// newline; `None` means there will never be another line.
pub trait LineSource {
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Polls `source` until a line of `min..=max` characters shows up. Anything
/// else is asked for again without complaint.
pub fn read_valid_line<L: LineSource + ?Sized>(
    source: &mut L,
    prompt: &str,
    min: usize,
    max: usize,
) -> Result<String> {
    loop {
        let line = source
            .next_line(prompt)
            .map_err(ChatError::Input)?
            .ok_or(ChatError::InputClosed)?;
        let len = line.chars().count();
        if (min..=max).contains(&len) {
            return Ok(line);
        }
        debug!(len, min, max, "rejected input line");
    }
}

pub fn read_handle<L: LineSource + ?Sized>(source: &mut L) -> Result<Handle> {
    let line = read_valid_line(source, HANDLE_PROMPT, 1, MAX_HANDLE_CHARS)?;
    Handle::new(line)
}

/// Canned input, mostly for driving sessions without a terminal.
#[derive(Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedLines {
    pub fn new<I, T>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ScriptedLines {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Every prompt shown so far, one entry per line requested.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn skips_empty_and_oversized_lines() {
        let mut source = ScriptedLines::new(["", "x".repeat(501).as_str(), "hello"]);
        let line = read_valid_line(&mut source, "> ", 1, 500).unwrap();
        assert_eq!(line, "hello");
        assert_eq!(source.prompts().len(), 3);
    }

    #[test]
    fn end_of_input_is_reported() {
        let mut source = ScriptedLines::new([""]);
        let err = read_valid_line(&mut source, "> ", 1, 500).unwrap_err();
        assert!(matches!(err, ChatError::InputClosed));
    }

    #[test]
    fn handle_prompt_repeats_until_valid() {
        let mut source = ScriptedLines::new(["", "waytoolonghandle", "Bob"]);
        let handle = read_handle(&mut source).unwrap();
        assert_eq!(handle.as_str(), "Bob");
        assert!(source.prompts().iter().all(|p| p == HANDLE_PROMPT));
    }

    proptest! {
        #[test]
        fn invalid_lines_never_advance(
            junk in proptest::collection::vec(
                prop_oneof![Just(String::new()), "[a-z]{501,600}"],
                0..5,
            ),
            valid in "[a-z ]{1,500}",
        ) {
            let skipped = junk.len();
            let mut lines = junk;
            lines.push(valid.clone());
            let mut source = ScriptedLines::new(lines);
            prop_assert_eq!(read_valid_line(&mut source, "> ", 1, 500).unwrap(), valid);
            prop_assert_eq!(source.prompts().len(), skipped + 1);
            prop_assert_eq!(source.remaining(), 0);
        }
    }
}
