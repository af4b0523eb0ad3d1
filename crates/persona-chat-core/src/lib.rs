pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod message;
pub mod personality;
pub mod scroll;
pub mod session;
pub mod viewport;

// Re-export main types for convenience
pub use client::{ChatBackend, ChatRequest, HttpChatClient, DEFAULT_API_URL};
pub use config::Config;
pub use conversation::Conversation;
pub use error::{ChatError, SendFailure};
pub use message::{Message, Sender};
pub use personality::Personality;
pub use scroll::{ScrollError, ScrollState};
pub use session::{ChatSession, KeyIntent, SendOutcome, SEND_FAILURE_NOTICE};
pub use viewport::{Correction, CorrectionAction, NoopViewport, ViewportCorrector, ViewportReconciler};
