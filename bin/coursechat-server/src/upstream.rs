//! Client for the course-listing and agent service.
//!
//! Both endpoints are opaque collaborators: one request, no retries, any
//! non-success status or malformed body becomes [`ServerError::Upstream`].

use std::time::Duration;

use tracing::{debug, info};

use crate::error::ServerError;
use crate::schemas::upstream::{AgentReply, AgentRequest, ExternalCourse};

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Internal(format!("failed to build upstream client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// `GET /api/list_courses`.
    pub async fn list_courses(&self) -> Result<Vec<ExternalCourse>, ServerError> {
        let url = format!("{}/api/list_courses", self.base_url);
        let courses: Vec<ExternalCourse> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = courses.len(), "fetched external course list");
        Ok(courses)
    }

    /// `POST /api/agent` with `{ "prompt": ... }`.
    pub async fn ask_agent(&self, prompt: &str) -> Result<AgentReply, ServerError> {
        let url = format!("{}/api/agent", self.base_url);
        let reply: AgentReply = self
            .http
            .post(&url)
            .json(&AgentRequest { prompt })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!(prompt_len = prompt.len(), reply_len = reply.result.len(), "agent replied");
        Ok(reply)
    }
}
