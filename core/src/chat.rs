use campuseats_common::ChatMessage;

pub const CHAT_GREETING: &str = "Hi! I am your CampusEats Assistant. Hungry? Confused? Just ask!";

/// Turns sent along when history threading is on.
pub const MAX_HISTORY_MESSAGES: usize = 12;

/// Conversation shown in the assistant panel.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: bool,
    thread_history: bool,
}

impl ChatSession {
    pub fn new(thread_history: bool) -> Self {
        Self {
            messages: vec![ChatMessage::bot(CHAT_GREETING)],
            pending: false,
            thread_history,
        }
    }

    /// Records a user message and returns what to send: the message and
    /// the prior turns to thread through (empty unless threading is on).
    /// Blank input, or input while a reply is outstanding, is ignored.
    pub fn submit(&mut self, input: &str) -> Option<(String, Vec<ChatMessage>)> {
        if input.trim().is_empty() || self.pending {
            return None;
        }
        let history = if self.thread_history {
            let skip = self.messages.len().saturating_sub(MAX_HISTORY_MESSAGES);
            self.messages[skip..].to_vec()
        } else {
            Vec::new()
        };
        let message = input.to_string();
        self.messages.push(ChatMessage::user(message.clone()));
        self.pending = true;
        Some((message, history))
    }

    pub fn receive_reply(&mut self, text: String) {
        self.messages.push(ChatMessage::bot(text));
        self.pending = false;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuseats_common::ChatRole;

    #[test]
    fn starts_with_greeting() {
        let chat = ChatSession::new(false);
        assert_eq!(chat.len(), 1);
        assert_eq!(chat.messages()[0].role, ChatRole::Bot);
        assert_eq!(chat.messages()[0].text, CHAT_GREETING);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut chat = ChatSession::new(false);
        assert!(chat.submit("   ").is_none());
        assert_eq!(chat.len(), 1);
    }

    #[test]
    fn second_message_waits_for_reply() {
        let mut chat = ChatSession::new(false);
        assert!(chat.submit("hi").is_some());
        assert!(chat.is_pending());
        assert!(chat.submit("hello?").is_none());
        chat.receive_reply("hey".to_string());
        assert!(!chat.is_pending());
        assert!(chat.submit("hello?").is_some());
        assert_eq!(chat.len(), 4);
    }

    #[test]
    fn history_is_not_threaded_by_default() {
        let mut chat = ChatSession::new(false);
        chat.submit("one").unwrap();
        chat.receive_reply("r1".to_string());
        let (message, history) = chat.submit("two").unwrap();
        assert_eq!(message, "two");
        assert!(history.is_empty());
    }

    #[test]
    fn threaded_history_is_capped() {
        let mut chat = ChatSession::new(true);
        for i in 0..10 {
            chat.submit(&format!("q{i}")).unwrap();
            chat.receive_reply(format!("a{i}"));
        }
        let (_, history) = chat.submit("last").unwrap();
        assert_eq!(history.len(), MAX_HISTORY_MESSAGES);
        assert_eq!(history.last().map(|m| m.text.as_str()), Some("a9"));
        assert!(history.iter().all(|m| m.text != "last"));
    }
}
