//! The chat page load and the chat form action.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthSession;
use crate::entities::{
    ConversationRecord, ConversationStore, CourseStore, MessageRecord, MessageRole, MessageStore,
};
use crate::error::ServerError;
use crate::schemas::chat::{ChatPageData, ChatQueryForm, ChatQueryResponse, CourseView};
use crate::services::course_sync::sync_courses;
use crate::services::history::group_by_conversation;
use crate::services::instructions::compose_instructions;
use crate::state::AppState;

const EMPTY_QUERY: &str = "Query cannot be empty";
const NO_COURSE: &str = "Choose a course to start a conversation";

/// Outbound prompt: `prompt + context + message`, missing parts empty.
pub fn compose_prompt(prompt: Option<&str>, context: Option<&str>, message: &str) -> String {
    let prompt = prompt.unwrap_or_default();
    let context = context.unwrap_or_default();
    let mut out = String::with_capacity(prompt.len() + context.len() + message.len());
    out.push_str(prompt);
    out.push_str(context);
    out.push_str(message);
    out
}

/// Sync the caller's courses from upstream and assemble recent history.
pub async fn load_chat_page(state: &AppState, auth: &AuthSession) -> Result<ChatPageData, ServerError> {
    let user_id = auth.user.id.as_str();

    let external = state.upstream.list_courses().await?;
    let synced = sync_courses(state.store.as_ref(), user_id, external).await?;
    debug!(user_id, external = synced.courses.len(), inserted = synced.inserted, "courses synced");

    let courses = state
        .store
        .list_courses_for_user(user_id)
        .await?
        .into_iter()
        .map(|c| CourseView {
            instructions: compose_instructions(&c),
            course: c.to_response(),
        })
        .collect();

    let recent = state
        .store
        .recent_messages_for_user(user_id, state.config.history_limit)
        .await?;
    let conversations = group_by_conversation(recent);
    debug!(user_id, conversations = conversations.len(), "chat page assembled");

    Ok(ChatPageData {
        user: auth.user.clone(),
        courses,
        conversations,
    })
}

enum Target {
    Existing(ConversationRecord),
    New { course_id: String },
}

/// Forward a chat query to the agent and persist both turns.
///
/// Field problems come back as `success: false`; upstream and storage
/// failures are errors. The two inserts are not atomic.
pub async fn submit_query(
    state: &AppState,
    auth: &AuthSession,
    form: ChatQueryForm,
) -> Result<ChatQueryResponse, ServerError> {
    if let Err(errors) = form.validate() {
        return Ok(ChatQueryResponse::failure(first_validation_message(&errors)));
    }

    let message = form.message.trim().to_owned();
    if message.is_empty() {
        return Ok(ChatQueryResponse::failure(EMPTY_QUERY));
    }

    let user_id = auth.user.id.as_str();
    let target = match non_empty(form.convo_id.as_deref()) {
        Some(convo_id) => {
            let convo = state
                .store
                .get_conversation(convo_id)
                .await?
                .filter(|c| c.user_id == user_id)
                .ok_or_else(|| ServerError::NotFound(format!("conversation '{convo_id}' not found")))?;
            Target::Existing(convo)
        }
        None => {
            let Some(course_id) = non_empty(form.course_id.as_deref()) else {
                return Ok(ChatQueryResponse::failure(NO_COURSE));
            };
            state
                .store
                .get_course(course_id)
                .await?
                .filter(|c| c.user_id.as_deref() == Some(user_id))
                .ok_or_else(|| ServerError::NotFound(format!("course '{course_id}' not found")))?;
            Target::New { course_id: course_id.to_owned() }
        }
    };

    let outbound = compose_prompt(form.prompt.as_deref(), form.context.as_deref(), &message);
    let reply = state.upstream.ask_agent(&outbound).await?;

    let convo_id = match target {
        Target::Existing(convo) => convo.id,
        Target::New { course_id } => {
            let now = Utc::now();
            let convo = ConversationRecord {
                id: Uuid::new_v4().to_string(),
                course_id,
                user_id: user_id.to_owned(),
                created_at: now,
                updated_at: now,
            };
            let id = convo.id.clone();
            state.store.create_conversation(convo).await?;
            info!(conversation_id = %id, "conversation started");
            id
        }
    };

    state
        .store
        .append_message(MessageRecord {
            id: Uuid::new_v4().to_string(),
            conversation_id: convo_id.clone(),
            role: MessageRole::User,
            content: message.clone(),
            created_at: Utc::now(),
        })
        .await?;

    let answered_at = Utc::now();
    state
        .store
        .append_message(MessageRecord {
            id: Uuid::new_v4().to_string(),
            conversation_id: convo_id.clone(),
            role: MessageRole::Agent,
            content: reply.result.clone(),
            created_at: answered_at,
        })
        .await?;
    state.store.touch_conversation(&convo_id, answered_at).await?;

    Ok(ChatQueryResponse::answered(message, reply.result, convo_id))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid form".to_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prompt_is_plain_concatenation() {
        assert_eq!(compose_prompt(Some("P:"), Some("C:"), "M"), "P:C:M");
        assert_eq!(compose_prompt(None, Some("C:"), "M"), "C:M");
        assert_eq!(compose_prompt(Some("P:"), None, "M"), "P:M");
        assert_eq!(compose_prompt(None, None, "M"), "M");
    }

    #[test]
    fn blank_ids_count_as_absent() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" c1 ")), Some("c1"));
        assert_eq!(non_empty(None), None);
    }
}
