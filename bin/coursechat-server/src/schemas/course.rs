use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::CourseRecord;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub canvas_id: String,
    pub name: String,
    pub discord_server_id: Option<String>,
    pub discord_channel_id: Option<String>,
    pub slack_workspace: Option<String>,
    pub created_at: String,
}

impl CourseRecord {
    pub fn to_response(&self) -> CourseResponse {
        CourseResponse {
            id: self.id.clone(),
            canvas_id: self.canvas_id.clone(),
            name: self.name.clone(),
            discord_server_id: self.discord_server_id.clone(),
            discord_channel_id: self.discord_channel_id.clone(),
            slack_workspace: self.slack_workspace.clone(),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}
