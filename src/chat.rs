use crate::greeting::InitialGreeting;
use chrono::{DateTime, Local};

pub const SEND_FAILED_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Message {
        sender: Sender,
        text: String,
        at: DateTime<Local>,
    },
    Greeting(InitialGreeting),
}

#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    awaiting_reply: bool,
}

impl Transcript {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// True between sending a message and receiving its reply.
    pub fn is_typing(&self) -> bool {
        self.awaiting_reply
    }

    /// Records the outgoing message. Returns the trimmed text to send, or
    /// `None` if there is nothing to send.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }
        self.push(Sender::User, message.to_string());
        self.awaiting_reply = true;
        Some(message.to_string())
    }

    pub fn receive(&mut self, reply: String) {
        self.awaiting_reply = false;
        self.push(Sender::Assistant, reply);
    }

    pub fn receive_error(&mut self) {
        self.receive(SEND_FAILED_MESSAGE.to_string());
    }

    pub fn push_greeting(&mut self, greeting: InitialGreeting) {
        self.entries.push(Entry::Greeting(greeting));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.awaiting_reply = false;
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.entries.push(Entry::Message {
            sender,
            text,
            at: Local::now(),
        });
    }
}
