//! Chat page view model and the chat form action.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::UserInfo;
use crate::entities::{MessageRecord, MessageRole};
use crate::schemas::course::CourseResponse;

/// Maximum accepted length of each form field, in characters.
pub const MAX_FIELD_CHARS: u64 = 128 * 1024;

/// Body limit for `POST /chat/query`: room for the three text fields at full
/// length, four bytes per char and percent-escaped, plus the two ids.
pub const MAX_FORM_BYTES: usize = 3 * (MAX_FIELD_CHARS as usize) * 4 * 3 + 64 * 1024;

/// Failure reported when the form body is over [`MAX_FORM_BYTES`].
pub const FORM_TOO_LARGE: &str = "Query is too long";

/// Form body of `POST /chat/query`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ChatQueryForm {
    /// The user's message, stored verbatim as the `user` row.
    #[serde(default)]
    #[validate(length(max = MAX_FIELD_CHARS, message = "Query is too long"))]
    pub message: String,
    /// Instructions prepended to the outbound prompt.
    #[validate(length(max = MAX_FIELD_CHARS, message = "Prompt is too long"))]
    pub prompt: Option<String>,
    /// Prior context inserted between the instructions and the message.
    #[validate(length(max = MAX_FIELD_CHARS, message = "Context is too long"))]
    pub context: Option<String>,
    /// Existing conversation to append to.
    #[serde(rename = "convoId")]
    pub convo_id: Option<String>,
    /// Course to open a new conversation under when `convoId` is absent.
    #[serde(rename = "courseId")]
    pub course_id: Option<String>,
}

/// Result of the chat action. Validation problems come back with
/// `success: false` and HTTP 200.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatQueryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub convo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ChatQueryResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            response: None,
            convo_id: None,
            error: Some(error.into()),
        }
    }

    pub fn answered(message: String, response: String, convo_id: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            response: Some(response),
            convo_id: Some(convo_id),
            error: None,
        }
    }
}

/// A course as shown on the chat page, with the agent instructions for it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseView {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub instructions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: String,
}

impl From<MessageRecord> for HistoryEntry {
    fn from(m: MessageRecord) -> Self {
        Self {
            id: m.id,
            role: m.role,
            content: m.content,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// One conversation's slice of the recent history, oldest message first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationHistory {
    pub conversation_id: String,
    pub messages: Vec<HistoryEntry>,
}

/// View model of `GET /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatPageData {
    pub user: UserInfo,
    pub courses: Vec<CourseView>,
    /// Most recently active conversation first.
    pub conversations: Vec<ConversationHistory>,
}
