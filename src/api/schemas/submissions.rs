use crate::adapters::local_store::StoredSubmission;
use crate::domain::submission::{FormCategory, SubmissionResult};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SubmissionResult> for SubmissionResponse {
    fn from(result: SubmissionResult) -> Self {
        Self { success: result.accepted, message: result.user_message }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSubmission {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub handle: String,
    pub category: FormCategory,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl From<StoredSubmission> for LocalSubmission {
    fn from(record: StoredSubmission) -> Self {
        Self {
            name: record.name,
            surname: record.surname,
            email: record.email,
            handle: record.handle,
            category: record.category,
            date: record.date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LocalSubmissionList {
    pub submissions: Vec<LocalSubmission>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::Rejection;

    #[test]
    fn test_accepted_response_omits_message() {
        let body = serde_json::to_value(SubmissionResponse::from(SubmissionResult::accepted())).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true }));
    }

    #[test]
    fn test_rejected_response_carries_message() {
        let result = SubmissionResult::rejected(Rejection::InvalidHandle, "bad handle".into());
        let body = serde_json::to_value(SubmissionResponse::from(result)).unwrap();
        assert_eq!(body, serde_json::json!({ "success": false, "message": "bad handle" }));
    }
}
