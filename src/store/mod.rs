//! Conversation store
//!
//! Owns the list of conversations and the active-conversation pointer, and
//! drives snapshot persistence. Invariants: the store always holds at least
//! one conversation, and resolving the active conversation always yields one
//! (falling back to the first when the active id has no match).

use crate::storage::SnapshotStorage;

pub mod conversation;

pub use conversation::{
    mint_time_id, title_from_message, ChatMessage, Conversation, Sender, DEFAULT_CONVERSATION_ID,
    PLACEHOLDER_TITLE, TITLE_SNIPPET_CHARS,
};

/// In-memory conversation state with snapshot-backed persistence
///
/// Every mutation in the chat flow is followed by a full [`persist`] pass;
/// there is no batching. A persist failure leaves both the in-memory state
/// and the previously persisted snapshot untouched.
///
/// [`persist`]: ConversationStore::persist
#[derive(Debug, Clone)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active_id: String,
}

impl ConversationStore {
    /// Create a fresh store with a single empty default conversation
    ///
    /// # Examples
    ///
    /// ```
    /// use jujuchat::store::{ConversationStore, DEFAULT_CONVERSATION_ID};
    ///
    /// let store = ConversationStore::new();
    /// assert_eq!(store.active().id, DEFAULT_CONVERSATION_ID);
    /// assert!(store.active().messages.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            conversations: vec![Conversation::default_conversation()],
            active_id: DEFAULT_CONVERSATION_ID.to_string(),
        }
    }

    /// Restore the store from a persisted snapshot
    ///
    /// Absence or a parse failure of either entry falls back to the default:
    /// a single empty conversation with the default active id. There is no
    /// schema versioning.
    pub fn load(storage: &SnapshotStorage) -> Self {
        let conversations = match storage.read_conversations() {
            Ok(Some(conversations)) if !conversations.is_empty() => conversations,
            Ok(_) => {
                tracing::debug!("No persisted conversations, starting fresh");
                return Self::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read persisted conversations: {}", e);
                return Self::new();
            }
        };

        let active_id = match storage.read_active_id() {
            Ok(Some(id)) => id,
            Ok(None) => DEFAULT_CONVERSATION_ID.to_string(),
            Err(e) => {
                tracing::warn!("Failed to read active conversation id: {}", e);
                DEFAULT_CONVERSATION_ID.to_string()
            }
        };

        Self {
            conversations,
            active_id,
        }
    }

    /// All conversations in creation order
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// The active conversation id as stored
    ///
    /// May name a conversation that no longer exists; [`active`] resolves
    /// the fallback.
    ///
    /// [`active`]: ConversationStore::active
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// Resolve the active conversation, falling back to the first
    pub fn active(&self) -> &Conversation {
        self.conversations
            .iter()
            .find(|c| c.id == self.active_id)
            .unwrap_or(&self.conversations[0])
    }

    /// Mutable access to the active conversation, with the same fallback
    fn active_mut(&mut self) -> &mut Conversation {
        let index = self
            .conversations
            .iter()
            .position(|c| c.id == self.active_id)
            .unwrap_or(0);
        &mut self.conversations[index]
    }

    /// Switch the active pointer to an existing conversation
    ///
    /// Returns false (and changes nothing) when the id has no match.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.conversations.iter().any(|c| c.id == id) {
            self.active_id = id.to_string();
            true
        } else {
            false
        }
    }

    /// Append a new empty conversation and make it active
    ///
    /// Returns the new conversation's id.
    pub fn create_conversation(&mut self) -> String {
        let conversation = Conversation::new(mint_time_id());
        let id = conversation.id.clone();
        self.conversations.push(conversation);
        self.active_id = id.clone();
        tracing::debug!("Created conversation {}", id);
        id
    }

    /// Remove a conversation by id
    ///
    /// If no conversations remain a fresh default one is created; the active
    /// pointer falls back to the first remaining conversation. Returns false
    /// when the id has no match. Explicit user confirmation is the caller's
    /// responsibility.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != id);
        if self.conversations.len() == before {
            return false;
        }

        if self.conversations.is_empty() {
            self.conversations.push(Conversation::default_conversation());
        }
        if self.active_id == id {
            self.active_id = self.conversations[0].id.clone();
        }
        tracing::debug!("Deleted conversation {}", id);
        true
    }

    /// Append a message to a conversation's log
    ///
    /// Returns false when the conversation id has no match. Logs have no
    /// size cap.
    pub fn append_message(&mut self, conversation_id: &str, message: ChatMessage) -> bool {
        match self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            Some(conversation) => {
                conversation.messages.push(message);
                true
            }
            None => false,
        }
    }

    /// Append a message to the active conversation
    pub fn append_to_active(&mut self, message: ChatMessage) {
        self.active_mut().messages.push(message);
    }

    /// Rewrite a placeholder title from the first user message, once
    ///
    /// Idempotent after the first rename: a conversation whose title was
    /// already rewritten is left untouched.
    pub fn rename_if_default(&mut self, conversation_id: &str, candidate: &str) {
        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            if conversation.has_placeholder_title() {
                conversation.title = title_from_message(candidate);
            }
        }
    }

    /// Persist the full store to the snapshot storage
    ///
    /// Heavy attachment payloads are stripped first (image previews kept,
    /// other raw content dropped). A write failure is logged and otherwise
    /// ignored: the previously persisted snapshot is never cleared.
    pub fn persist(&self, storage: &SnapshotStorage) {
        let stripped: Vec<Conversation> = self
            .conversations
            .iter()
            .map(|conversation| Conversation {
                id: conversation.id.clone(),
                title: conversation.title.clone(),
                messages: conversation
                    .messages
                    .iter()
                    .map(|message| ChatMessage {
                        id: message.id.clone(),
                        text: message.text.clone(),
                        sender: message.sender,
                        attachments: message
                            .attachments
                            .iter()
                            .map(|file| file.persistable())
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        if let Err(e) = storage.write_snapshot(&stripped, &self.active_id) {
            tracing::warn!("Skipping snapshot write: {}", e);
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
