//! Renderer-side model of the conversation.
//!
//! The transcript is the list of display messages plus the single
//! streaming-reply accumulator. It consumes [`RenderAction`]s from the
//! session dispatcher; the TUI panes draw from it. At most one streamed
//! reply is open at any time; the dispatcher closes it before rendering
//! anything that is not a text fragment.

use crate::session::RenderAction;

/// Role / category of a transcript message. Determines the icon and colour
/// used when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// User-submitted prompt (▶)
    User,
    /// Streamed assistant reply (◀)
    Assistant,
    /// Neutral informational (ℹ)
    Info,
    /// Positive confirmation (✔)
    Success,
    /// Non-critical warning (⚠)
    Warning,
    /// Hard error (✘)
    Error,
    /// Backend progress line (·)
    Status,
}

impl MessageRole {
    /// Leading icon character for display.
    pub fn icon(self) -> &'static str {
        match self {
            Self::User => "▶",
            Self::Assistant => "◀",
            Self::Info => "ℹ",
            Self::Success => "✔",
            Self::Warning => "⚠",
            Self::Error => "✘",
            Self::Status => "·",
        }
    }
}

/// A single line (or block) in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMessage {
    pub role: MessageRole,
    pub content: String,
}

impl DisplayMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
    pub fn info(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Info, content)
    }
    pub fn success(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Success, content)
    }
    pub fn warning(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Warning, content)
    }
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Error, content)
    }
    pub fn status(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Status, content)
    }
}

/// The rendered conversation.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<DisplayMessage>,
    /// Accumulator for the streamed reply currently being received. While
    /// open, the last message is the assistant entry it feeds.
    reply: Option<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    /// Whether a streamed reply is currently accumulating.
    pub fn reply_open(&self) -> bool {
        self.reply.is_some()
    }

    pub fn push(&mut self, message: DisplayMessage) {
        self.messages.push(message);
    }

    /// Apply one render action from the dispatcher.
    pub fn apply(&mut self, action: RenderAction) {
        match action {
            RenderAction::Info(text) => self.push(DisplayMessage::info(text)),
            RenderAction::Success(text) => self.push(DisplayMessage::success(text)),
            RenderAction::Warning(text) => self.push(DisplayMessage::warning(text)),
            RenderAction::Error(text) => self.push(DisplayMessage::error(text)),
            RenderAction::User(text) => self.push(DisplayMessage::user(text)),
            RenderAction::Raw(raw) => self.push(DisplayMessage::warning(raw)),

            RenderAction::Status { message, tool } => {
                let content = match tool {
                    Some(tool) => format!("{message} · {tool}"),
                    None => message,
                };
                self.push(DisplayMessage::status(content));
            }

            RenderAction::ReplyDelta(delta) => self.append_reply(&delta),

            RenderAction::CloseReply => self.close_reply(),
        }
    }

    /// Append a fragment to the open reply, opening one if needed, and
    /// refresh the assistant entry it renders into.
    fn append_reply(&mut self, delta: &str) {
        if self.reply.is_none() {
            self.reply = Some(String::new());
            self.messages.push(DisplayMessage::assistant(""));
        }
        if let Some(buf) = self.reply.as_mut() {
            buf.push_str(delta);
            if let Some(last) = self.messages.last_mut() {
                last.content = buf.clone();
            }
        }
    }

    /// Finalize the open reply. An all-whitespace reply leaves no entry
    /// behind.
    fn close_reply(&mut self) {
        let Some(buf) = self.reply.take() else {
            return;
        };
        let trimmed = buf.trim_end();
        match self.messages.last_mut() {
            Some(last) if last.role == MessageRole::Assistant => {
                if trimmed.is_empty() {
                    self.messages.pop();
                } else {
                    last.content = trimmed.to_string();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deltas(transcript: &mut Transcript, parts: &[&str]) {
        for part in parts {
            transcript.apply(RenderAction::ReplyDelta(part.to_string()));
        }
    }

    #[test]
    fn reply_fragments_concatenate_in_arrival_order() {
        let mut transcript = Transcript::new();
        deltas(&mut transcript, &["Hi", " there", ", friend"]);
        let last = transcript.messages().last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.content, "Hi there, friend");
    }

    #[test]
    fn first_delta_opens_exactly_one_reply() {
        let mut transcript = Transcript::new();
        assert!(!transcript.reply_open());
        deltas(&mut transcript, &["a", "b"]);
        assert!(transcript.reply_open());
        let assistant_entries = transcript
            .messages()
            .iter()
            .filter(|m| m.role == MessageRole::Assistant)
            .count();
        assert_eq!(assistant_entries, 1);
    }

    #[test]
    fn close_trims_trailing_whitespace() {
        let mut transcript = Transcript::new();
        deltas(&mut transcript, &["Hello", " world", "\n\n"]);
        transcript.apply(RenderAction::CloseReply);
        assert!(!transcript.reply_open());
        assert_eq!(transcript.messages().last().unwrap().content, "Hello world");
    }

    #[test]
    fn close_without_open_reply_is_a_no_op() {
        let mut transcript = Transcript::new();
        transcript.apply(RenderAction::Info("hello".into()));
        transcript.apply(RenderAction::CloseReply);
        assert_eq!(transcript.messages().len(), 1);
    }

    #[test]
    fn whitespace_only_reply_leaves_no_entry() {
        let mut transcript = Transcript::new();
        deltas(&mut transcript, &["  ", "\n"]);
        transcript.apply(RenderAction::CloseReply);
        assert!(transcript.messages().is_empty());
    }

    #[test]
    fn a_second_turn_opens_a_fresh_reply() {
        let mut transcript = Transcript::new();
        deltas(&mut transcript, &["first"]);
        transcript.apply(RenderAction::CloseReply);
        deltas(&mut transcript, &["second"]);
        transcript.apply(RenderAction::CloseReply);

        let replies: Vec<&str> = transcript
            .messages()
            .iter()
            .filter(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(replies, vec!["first", "second"]);
    }

    #[test]
    fn status_line_includes_tool_name() {
        let mut transcript = Transcript::new();
        transcript.apply(RenderAction::Status {
            message: "Querying memory".into(),
            tool: Some("graph_search".into()),
        });
        let last = transcript.messages().last().unwrap();
        assert_eq!(last.role, MessageRole::Status);
        assert_eq!(last.content, "Querying memory · graph_search");
    }

    #[test]
    fn raw_frames_display_verbatim() {
        let mut transcript = Transcript::new();
        let raw = r#"{"type":"mystery","payload":{}}"#;
        transcript.apply(RenderAction::Raw(raw.into()));
        assert_eq!(transcript.messages().last().unwrap().content, raw);
    }
}
