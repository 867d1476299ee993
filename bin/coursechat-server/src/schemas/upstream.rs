//! Wire types of the course-listing and agent service.
//!
//! Responses are parsed into these closed types at the boundary; anything
//! that does not fit is an upstream failure.

use serde::{Deserialize, Deserializer, Serialize};

/// One entry of `GET /api/list_courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCourse {
    /// Learning-platform course id. Sent as a number by some deployments.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// Body of `POST /api/agent`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRequest<'a> {
    pub prompt: &'a str,
}

/// Response of `POST /api/agent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReply {
    pub result: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn course_ids_accept_numbers_and_strings() {
        let courses: Vec<ExternalCourse> = serde_json::from_str(
            r#"[{"id": 1234, "name": "Compilers", "account_id": 1, "root_account_id": 1},
                {"id": "abc", "name": "Databases"}]"#,
        )
        .unwrap();
        assert_eq!(courses[0].id, "1234");
        assert_eq!(courses[1].id, "abc");
        assert_eq!(courses[1].name, "Databases");
    }

    #[test]
    fn course_without_name_is_rejected() {
        let parsed: Result<Vec<ExternalCourse>, _> = serde_json::from_str(r#"[{"id": 1}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn agent_reply_requires_result() {
        assert!(serde_json::from_str::<AgentReply>(r#"{"output": "hi"}"#).is_err());
        let reply: AgentReply = serde_json::from_str(r#"{"result": "hi", "extra": 1}"#).unwrap();
        assert_eq!(reply.result, "hi");
    }
}
