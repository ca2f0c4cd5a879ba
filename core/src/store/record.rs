// Stored record types

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chat-side identifier as the bot layer hands it over.
///
/// Telegram message and chat ids are integers, but callers may pass them
/// through as strings. Both forms are kept exactly as given so the file
/// round-trips: a number stays a JSON number, a string stays a JSON string.
/// Values written by other tools that fit neither (floats, `null`, integers
/// beyond `i64`) are carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl Identifier {
    /// Parse a command-line argument: integers become `Number`, anything
    /// else is kept as `Text`.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => Identifier::Number(n),
            Err(_) => Identifier::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Identifier::Number(n) => Some(*n),
            Identifier::Text(_) | Identifier::Other(_) => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Text(s) => write!(f, "{}", s),
            Identifier::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Identifier::Number(n)
    }
}

impl From<i32> for Identifier {
    fn from(n: i32) -> Self {
        Identifier::Number(n as i64)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::Text(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier::Text(s)
    }
}

/// Where an invoice (or action) message lives in the chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Id of the posted message
    pub message_id: Identifier,

    /// Chat the message was posted in
    pub chat_id: Identifier,

    /// ISO-8601 time of the last upsert (empty if the entry had none)
    #[serde(default)]
    pub timestamp: String,
}

impl MessageRecord {
    /// Create a record stamped with the current UTC time.
    pub fn new(message_id: impl Into<Identifier>, chat_id: impl Into<Identifier>) -> Self {
        Self {
            message_id: message_id.into(),
            chat_id: chat_id.into(),
            timestamp: current_timestamp(),
        }
    }

    /// Parse the stored timestamp.
    ///
    /// Accepts RFC 3339 (what this crate writes) as well as offset-less
    /// ISO-8601 strings such as `2024-03-01T09:15:00.123456`, which are read
    /// as UTC.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Deep link to the message, e.g. `https://t.me/c/4900809502/17`.
    ///
    /// Only supergroup chats (`-100<internal id>`) have such links; any other
    /// chat id yields `None`.
    pub fn message_link(&self) -> Option<String> {
        let chat = self.chat_id.as_number()?.to_string();
        let internal = chat.strip_prefix("-100")?;
        if internal.is_empty() {
            return None;
        }
        Some(format!("https://t.me/c/{}/{}", internal, self.message_id))
    }
}

fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
