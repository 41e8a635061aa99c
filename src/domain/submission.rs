use serde::{Deserialize, Serialize};
use std::fmt;

/// Which form on the landing page produced the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormCategory {
    #[default]
    Signup,
    Consultation,
}

impl FormCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Consultation => "consultation",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "signup" => Some(Self::Signup),
            "consultation" => Some(Self::Consultation),
            _ => None,
        }
    }
}

impl fmt::Display for FormCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schema-valid signup or consultation request.
///
/// The handle is stored as received until the normalizer has run; after
/// [`SubmissionRequest::with_handle`] it always carries the `@` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub handle: String,
    pub category: FormCategory,
}

impl SubmissionRequest {
    #[must_use]
    pub fn with_handle(self, handle: String) -> Self {
        Self { handle, ..self }
    }
}

/// Why a submission did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Validation,
    InvalidHandle,
    Persistence,
    Unexpected,
}

/// The single value handed back to the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub accepted: bool,
    pub user_message: Option<String>,
    pub degraded: bool,
    pub rejection: Option<Rejection>,
}

impl SubmissionResult {
    #[must_use]
    pub const fn accepted() -> Self {
        Self { accepted: true, user_message: None, degraded: false, rejection: None }
    }

    #[must_use]
    pub const fn degraded(message: String) -> Self {
        Self { accepted: true, user_message: Some(message), degraded: true, rejection: None }
    }

    #[must_use]
    pub const fn rejected(rejection: Rejection, message: String) -> Self {
        Self { accepted: false, user_message: Some(message), degraded: false, rejection: Some(rejection) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_defaults_to_signup() {
        assert_eq!(FormCategory::default(), FormCategory::Signup);
    }

    #[test]
    fn test_category_parse_closed_set() {
        assert_eq!(FormCategory::parse("consultation"), Some(FormCategory::Consultation));
        assert_eq!(FormCategory::parse("Signup"), None);
        assert_eq!(FormCategory::parse(""), None);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&FormCategory::Consultation).unwrap();
        assert_eq!(json, "\"consultation\"");
    }
}
