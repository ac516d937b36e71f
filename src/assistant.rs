//! Gaming assistant chat session
//!
//! Keeps the message log and the one-request-at-a-time rule. Sending the
//! request to a model is left to the host: `submit` hands back a
//! `ChatRequest`, the host answers with `complete`.

use std::fmt;

use serde::Serialize;

use crate::catalog;

const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that.";
const FAILURE_REPLY: &str = "My brain is currently resting. Please try again later!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
}

/// Failure reported by the host's transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    /// No credentials or no network
    Unavailable,
    /// The service answered with an error
    Service(String),
}

impl fmt::Display for AssistantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "assistant unavailable"),
            Self::Service(reason) => write!(f, "assistant service error: {}", reason),
        }
    }
}

impl std::error::Error for AssistantError {}

/// What the host should send to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub system_instruction: String,
}

/// Instruction listing the portal's games
pub fn system_instruction(titles: &[&str]) -> String {
    format!(
        "You are the Neon Arcade gaming assistant. You are helpful, polite, and can talk in \
         English, Urdu, and Roman Urdu.\nAvailable games: {}.\nBe concise and gaming-focused. \
         If the user asks in Urdu, reply in Urdu or Roman Urdu depending on their style.",
        titles.join(", ")
    )
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<Message>,
    next_id: u64,
    in_flight: bool,
}

impl ChatSession {
    /// New session opened by the assistant's welcome line
    pub fn new(welcome: &str) -> Self {
        let mut session = Self {
            messages: Vec::new(),
            next_id: 1,
            in_flight: false,
        };
        session.push(welcome.to_string(), Sender::Assistant);
        session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// A request is waiting for its reply; input stays disabled
    pub fn is_waiting(&self) -> bool {
        self.in_flight
    }

    fn push(&mut self, text: String, sender: Sender) {
        self.messages.push(Message {
            id: self.next_id,
            text,
            sender,
        });
        self.next_id += 1;
    }

    /// Log the user's message and build the request. `None` for blank input
    /// or while a previous request is still out.
    pub fn submit(&mut self, input: &str) -> Option<ChatRequest> {
        if input.trim().is_empty() || self.in_flight {
            return None;
        }
        self.push(input.to_string(), Sender::User);
        self.in_flight = true;
        Some(ChatRequest {
            prompt: input.to_string(),
            system_instruction: system_instruction(&catalog::titles()),
        })
    }

    /// Record the outcome of the outstanding request
    pub fn complete(&mut self, reply: Result<String, AssistantError>) {
        if !self.in_flight {
            log::debug!("Ignoring assistant reply with no request in flight");
            return;
        }
        let text = match reply {
            Ok(text) if text.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(text) => text,
            Err(e) => {
                log::error!("Assistant request failed: {}", e);
                FAILURE_REPLY.to_string()
            }
        };
        self.push(text, Sender::Assistant);
        self.in_flight = false;
    }
}
