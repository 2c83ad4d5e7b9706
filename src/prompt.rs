//! Prompt construction
//!
//! Builds the ordered message list sent to the completion provider: one
//! system entry carrying the assistant persona, the prior conversation
//! history in original order, then the new user turn. Attachment contents
//! are inlined into the new user turn as a textual appendix placed before
//! the question so the model reads the material first.

use crate::attachments::AttachedFile;
use crate::providers::Message;
use crate::store::{ChatMessage, Sender};

/// Build the completion message list for a submission
///
/// # Arguments
///
/// * `system_prompt` - Persona and response policy from configuration
/// * `history` - Prior messages of the conversation, oldest first
/// * `user_text` - The new user input, already validated
/// * `attachments` - Files staged for this submission
///
/// # Examples
///
/// ```
/// use jujuchat::prompt::build_messages;
///
/// let messages = build_messages("You are helpful.", &[], "Halo", &[]);
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, "system");
/// assert_eq!(messages[1].role, "user");
/// assert_eq!(messages[1].content, "Halo");
/// ```
pub fn build_messages(
    system_prompt: &str,
    history: &[ChatMessage],
    user_text: &str,
    attachments: &[AttachedFile],
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));

    for entry in history {
        match entry.sender {
            Sender::User => messages.push(Message::user(&entry.text)),
            Sender::Assistant => messages.push(Message::assistant(&entry.text)),
        }
    }

    messages.push(Message::user(compose_user_turn(user_text, attachments)));
    messages
}

/// Inline staged attachments ahead of the user's question
fn compose_user_turn(user_text: &str, attachments: &[AttachedFile]) -> String {
    if attachments.is_empty() {
        return user_text.to_string();
    }

    let mut turn = String::from("The user attached the following files:\n\n");
    for file in attachments {
        turn.push_str(&file.prompt_fragment());
        turn.push_str("\n\n");
    }
    turn.push_str(user_text);
    turn
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_attachment(name: &str, content: &str) -> AttachedFile {
        AttachedFile {
            name: name.to_string(),
            mime_type: "text/plain".to_string(),
            data: Some(content.as_bytes().to_vec()),
            preview: None,
            text_content: Some(content.to_string()),
            description: None,
        }
    }

    #[test]
    fn test_system_prompt_comes_first() {
        let messages = build_messages("persona", &[], "hi", &[]);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "persona");
    }

    #[test]
    fn test_history_preserves_order_and_roles() {
        let history = vec![
            ChatMessage::from_user("first", Vec::new()),
            ChatMessage::from_assistant("second"),
            ChatMessage::from_user("third", Vec::new()),
        ];

        let messages = build_messages("persona", &history, "fourth", &[]);
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "first");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[2].content, "second");
        assert_eq!(messages[3].role, "user");
        assert_eq!(messages[3].content, "third");
        assert_eq!(messages[4].role, "user");
        assert_eq!(messages[4].content, "fourth");
    }

    #[test]
    fn test_attachments_inlined_before_question() {
        let files = vec![text_attachment("notes.txt", "remember the milk")];
        let messages = build_messages("persona", &[], "what do my notes say?", &files);

        let turn = &messages.last().unwrap().content;
        assert!(turn.contains("notes.txt"));
        assert!(turn.contains("remember the milk"));
        let appendix = turn.find("remember the milk").unwrap();
        let question = turn.find("what do my notes say?").unwrap();
        assert!(appendix < question);
    }

    #[test]
    fn test_no_attachments_leaves_text_untouched() {
        let messages = build_messages("persona", &[], "plain question", &[]);
        assert_eq!(messages.last().unwrap().content, "plain question");
    }
}
