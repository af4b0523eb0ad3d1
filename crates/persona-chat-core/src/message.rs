//! UI-agnostic chat message types
//!
//! These are shared by every front end and don't depend on any UI framework.

use serde::{Deserialize, Serialize};

/// A single line in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: Sender,
    pub text: String,
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    System,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { from: Sender::User, text: text.into() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { from: Sender::Bot, text: text.into() }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self { from: Sender::System, text: text.into() }
    }
}
