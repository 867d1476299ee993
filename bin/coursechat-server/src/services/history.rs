//! Groups recent messages into per-conversation transcripts.

use std::collections::HashMap;

use crate::entities::MessageRecord;
use crate::schemas::chat::{ConversationHistory, HistoryEntry};

/// Group `newest_first` (as returned by
/// [`MessageStore::recent_messages_for_user`](crate::entities::MessageStore::recent_messages_for_user))
/// by conversation id.
///
/// Conversations appear in first-seen order, so the most recently active one
/// comes first. Messages inside each conversation are oldest first.
pub fn group_by_conversation(newest_first: Vec<MessageRecord>) -> Vec<ConversationHistory> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ConversationHistory> = Vec::new();

    for message in newest_first {
        let slot = *slots.entry(message.conversation_id.clone()).or_insert_with(|| {
            groups.push(ConversationHistory {
                conversation_id: message.conversation_id.clone(),
                messages: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].messages.push(HistoryEntry::from(message));
    }

    for group in &mut groups {
        group.messages.reverse();
    }
    groups
}
