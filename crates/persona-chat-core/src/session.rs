//! Chat session state: the conversation, the draft, the busy flag and the
//! active personality, plus the send and personality-switch flows.
//!
//! Sending is split in two halves so a UI can keep drawing while the request
//! is in flight: `begin_send` does the optimistic work and hands back the
//! request, `complete_send` folds the result into the conversation.

use crate::client::{ChatBackend, ChatRequest};
use crate::conversation::Conversation;
use crate::error::{ChatError, SendFailure};
use crate::message::Message;
use crate::personality::Personality;
use crate::scroll::ScrollState;

pub const SEND_FAILURE_NOTICE: &str =
    "Sorry, I encountered an error. Please make sure the backend server is running.";

/// How a finished request landed in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Replied,
    Failed,
}

/// What an Enter key press should do in the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Submit,
    Newline,
}

impl KeyIntent {
    pub fn from_enter(shift: bool) -> Self {
        if shift {
            KeyIntent::Newline
        } else {
            KeyIntent::Submit
        }
    }
}

#[derive(Debug, Default)]
pub struct ChatSession {
    conversation: Conversation,
    draft: String,
    busy: bool,
    personality: Personality,
    scroll: ScrollState,
}

impl ChatSession {
    pub fn new(personality: Personality) -> Self {
        Self {
            personality,
            ..Self::default()
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }

    /// Optimistic half of a send.
    ///
    /// Returns `None` without touching anything when the trimmed draft is
    /// empty or a request is already in flight.
    pub fn begin_send(&mut self) -> Option<ChatRequest> {
        let text = self.draft.trim();
        if text.is_empty() || self.busy {
            return None;
        }

        let text = text.to_string();
        self.conversation.append(Message::user(text.clone()));
        self.draft.clear();
        self.busy = true;
        self.scroll.request_bottom();

        Some(ChatRequest {
            message: text,
            personality: self.personality,
        })
    }

    /// Completion half of a send. Always clears the busy flag.
    pub fn complete_send(&mut self, result: Result<String, SendFailure>) -> SendOutcome {
        let outcome = match result {
            Ok(reply) => {
                self.conversation.append(Message::bot(reply));
                SendOutcome::Replied
            }
            Err(e) => {
                tracing::error!(error = %e, "chat request failed");
                self.conversation.append(Message::bot(SEND_FAILURE_NOTICE));
                SendOutcome::Failed
            }
        };

        self.busy = false;
        self.scroll.request_bottom();
        outcome
    }

    /// Run both halves inline against `backend`.
    pub async fn send_message<B>(&mut self, backend: &B) -> Option<SendOutcome>
    where
        B: ChatBackend + ?Sized,
    {
        let request = self.begin_send()?;
        let result = backend.send(&request).await;
        Some(self.complete_send(result))
    }

    /// Switch personality, announcing it when a conversation is underway.
    ///
    /// Returns whether a system notice was appended.
    pub fn change_personality(&mut self, personality: Personality) -> bool {
        if personality == self.personality {
            return false;
        }

        self.personality = personality;
        tracing::info!(personality = personality.value(), "personality changed");

        if self.conversation.is_empty() {
            return false;
        }

        self.conversation.append(Message::system(format!(
            "✨ Switched to {} mode",
            personality.label()
        )));
        self.scroll.request_bottom();
        true
    }

    pub fn change_personality_by_value(&mut self, value: &str) -> Result<bool, ChatError> {
        let personality = Personality::from_value(value)
            .ok_or_else(|| ChatError::UnknownPersonality(value.to_string()))?;
        Ok(self.change_personality(personality))
    }

    /// Apply a pending scroll request against the measured list geometry.
    ///
    /// Failures are logged and swallowed; the request is retried next frame.
    pub fn reconcile_scroll(&mut self, total_rows: u16, visible_rows: u16) -> bool {
        match self.scroll.apply_pending(total_rows, visible_rows) {
            Ok(scrolled) => scrolled,
            Err(e) => {
                tracing::debug!(error = %e, "deferred scroll-to-bottom skipped");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::message::Sender;

    /// Replays canned results and records every request it sees
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String, SendFailure>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, SendFailure>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send(&self, request: &ChatRequest) -> Result<String, SendFailure> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SendFailure::MalformedResponse("no reply scripted".into())))
        }
    }

    #[test]
    fn test_blank_draft_is_a_no_op() {
        let mut session = ChatSession::default();
        session.set_draft("   \n\t ");

        assert!(session.begin_send().is_none());
        assert!(session.conversation().is_empty());
        assert!(!session.is_busy());
        assert_eq!(session.draft(), "   \n\t ");
    }

    #[test]
    fn test_send_while_busy_is_a_no_op() {
        let mut session = ChatSession::default();
        session.set_draft("first");
        let first = session.begin_send();
        assert!(first.is_some());

        session.set_draft("second");
        assert!(session.begin_send().is_none());
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.draft(), "second");
        assert!(session.is_busy());
    }

    #[test]
    fn test_begin_send_is_optimistic() {
        let mut session = ChatSession::new(Personality::Sarcastic);
        session.set_draft("  hello  ");

        let request = session.begin_send().unwrap();
        assert_eq!(request.message, "hello");
        assert_eq!(request.personality, Personality::Sarcastic);
        assert_eq!(session.conversation().messages(), &[Message::user("hello")]);
        assert_eq!(session.draft(), "");
        assert!(session.is_busy());
        assert!(session.scroll().is_pending());
    }

    #[tokio::test]
    async fn test_successful_send() {
        let backend = ScriptedBackend::new(vec![Ok("hi there".to_string())]);
        let mut session = ChatSession::default();
        session.set_draft("hello");

        let outcome = session.send_message(&backend).await;

        assert_eq!(outcome, Some(SendOutcome::Replied));
        assert_eq!(
            session.conversation().messages(),
            &[Message::user("hello"), Message::bot("hi there")]
        );
        assert_eq!(session.draft(), "");
        assert!(!session.is_busy());
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_send_appends_notice() {
        let backend = ScriptedBackend::new(vec![Err(SendFailure::Interrupted("connection reset".into()))]);
        let mut session = ChatSession::default();
        session.set_draft("hello");

        let outcome = session.send_message(&backend).await;

        assert_eq!(outcome, Some(SendOutcome::Failed));
        assert_eq!(
            session.conversation().messages(),
            &[Message::user("hello"), Message::bot(SEND_FAILURE_NOTICE)]
        );
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_blank_send_issues_no_request() {
        let backend = ScriptedBackend::new(vec![]);
        let mut session = ChatSession::default();

        assert_eq!(session.send_message(&backend).await, None);
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_sequential_sends_alternate() {
        let n = 5;
        let replies = (0..n).map(|i| Ok(format!("reply {}", i))).collect();
        let backend = ScriptedBackend::new(replies);
        let mut session = ChatSession::default();

        for i in 0..n {
            session.set_draft(format!("question {}", i));
            session.send_message(&backend).await;
        }

        let messages = session.conversation().messages();
        assert_eq!(messages.len(), 2 * n);
        for (i, msg) in messages.iter().enumerate() {
            let expected = if i % 2 == 0 { Sender::User } else { Sender::Bot };
            assert_eq!(msg.from, expected);
        }
    }

    #[tokio::test]
    async fn test_request_carries_active_personality() {
        let backend = ScriptedBackend::new(vec![Ok("ok".into())]);
        let mut session = ChatSession::default();
        session.change_personality(Personality::Energetic);
        session.set_draft("go");
        session.send_message(&backend).await;

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests[0].personality, Personality::Energetic);
    }

    #[test]
    fn test_personality_switch_on_empty_conversation_is_silent() {
        let mut session = ChatSession::default();
        assert!(!session.change_personality(Personality::Polite));
        assert!(session.conversation().is_empty());
        assert_eq!(session.personality(), Personality::Polite);
    }

    #[test]
    fn test_personality_switch_announces_new_label() {
        let mut session = ChatSession::default();
        session.set_draft("hello");
        session.begin_send();
        session.complete_send(Ok("hi".into()));

        assert!(session.change_personality(Personality::Sarcastic));
        assert_eq!(session.conversation().len(), 3);

        let notice = session.conversation().last().unwrap();
        assert_eq!(notice.from, Sender::System);
        assert!(notice.text.contains(Personality::Sarcastic.label()));
    }

    #[test]
    fn test_unknown_personality_value_is_rejected() {
        let mut session = ChatSession::default();
        let err = session.change_personality_by_value("grumpy").unwrap_err();
        assert!(matches!(err, ChatError::UnknownPersonality(v) if v == "grumpy"));
        assert_eq!(session.personality(), Personality::Friendly);
    }

    #[test]
    fn test_enter_intent() {
        assert_eq!(KeyIntent::from_enter(false), KeyIntent::Submit);
        assert_eq!(KeyIntent::from_enter(true), KeyIntent::Newline);
    }

    #[test]
    fn test_reconcile_scroll_swallows_detached() {
        let mut session = ChatSession::default();
        session.set_draft("hello");
        session.begin_send();

        assert!(!session.reconcile_scroll(12, 0));
        assert!(session.scroll().is_pending());
        assert!(session.reconcile_scroll(12, 5));
        assert_eq!(session.scroll().offset(), 7);
    }
}
