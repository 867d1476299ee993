//! Agent instructions for a course.

use crate::entities::CourseRecord;

/// Compose the system prompt the client sends as `prompt` when chatting
/// about `course`.
pub fn compose_instructions(course: &CourseRecord) -> String {
    let mut out = format!(
        "You are a teaching assistant with tools for the Canvas LMS, Discord and Slack. \
         Use them in whatever order the request needs and report back what you find. \
         The current course is \"{name}\" (Canvas course id {canvas_id}); answer about it \
         unless the user clearly asks about another course, and call it by its name \
         rather than its id.",
        name = course.name,
        canvas_id = course.canvas_id,
    );
    let discord = match (&course.discord_server_id, &course.discord_channel_id) {
        (Some(server), Some(channel)) => {
            Some(format!(" Its Discord server id is {server} and its channel id is {channel}."))
        }
        (Some(server), None) => Some(format!(" Its Discord server id is {server}.")),
        (None, Some(channel)) => Some(format!(" Its Discord channel id is {channel}.")),
        (None, None) => None,
    };
    if let Some(line) = discord {
        out.push_str(&line);
    }
    if let Some(slack) = &course.slack_workspace {
        out.push_str(&format!(" Its Slack workspace is {slack}."));
    }
    out.push_str(" Only run the AI-writing check when the user asks for it.\n\n");
    out
}
