use std::io;

/// Consumer of everything the session wants the local operator to see.
pub trait DisplaySink {
    /// Chat text received from the peer, framing already removed.
    fn message(&mut self, text: &str) -> io::Result<()>;

    /// Lifecycle information such as disconnects.
    fn notice(&mut self, text: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Displayed {
    Message(String),
    Notice(String),
}

/// Keeps everything it is shown, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Vec<Displayed>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Displayed] {
        &self.entries
    }

    pub fn messages(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Displayed::Message(text) => Some(text.as_str()),
                Displayed::Notice(_) => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingSink {
    fn message(&mut self, text: &str) -> io::Result<()> {
        self.entries.push(Displayed::Message(text.to_string()));
        Ok(())
    }

    fn notice(&mut self, text: &str) -> io::Result<()> {
        self.entries.push(Displayed::Notice(text.to_string()));
        Ok(())
    }
}
