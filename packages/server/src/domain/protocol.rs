//! Wire protocol: every string a chat client ever sees.
//!
//! Lines are `\n`-terminated. Prompts are not, so the client keeps typing on
//! the same line.

use super::{
    entity::ChatMessage,
    value_object::{ClientName, Timestamp},
};

pub const WELCOME_MESSAGE: &str = "Welcome to TCP-Chat!\n";
pub const ENTER_NAME_PROMPT: &str = "[ENTER YOUR NAME]: ";
pub const WRONG_NAME_MESSAGE: &str = "Wrong name\n";
pub const NAME_TAKEN_MESSAGE: &str = "Name is already taken\n";
pub const SERVER_FULL_MESSAGE: &str = "Server is full, try again later.\n";

/// Welcome text, logo and the first name prompt
pub fn greeting(logo: &str) -> String {
    let logo = logo.trim_end_matches(['\r', '\n']);
    let mut output = String::from(WELCOME_MESSAGE);
    if !logo.is_empty() {
        output.push_str(logo);
        output.push('\n');
    }
    output.push_str(ENTER_NAME_PROMPT);
    output
}

/// A naming-phase rejection followed by a fresh name prompt
pub fn naming_rejection(reason: &str) -> String {
    format!("{}{}", reason, ENTER_NAME_PROMPT)
}

/// `[ts][sender]: text\n`, as replayed to joining clients
pub fn message_line(message: &ChatMessage) -> String {
    format!(
        "[{}][{}]: {}\n",
        message.sent_at,
        message.sender,
        message.content.as_str()
    )
}

/// `[ts][name]: ` input prompt
pub fn prompt(name: &ClientName, now: Timestamp) -> String {
    format!("[{}][{}]: ", now, name)
}

/// What a live recipient receives for one broadcast: the message on its own
/// line, then the recipient's prompt redrawn.
pub fn delivery(message: &ChatMessage, recipient: &ClientName, now: Timestamp) -> String {
    format!("\n{}{}", message_line(message), prompt(recipient, now))
}
