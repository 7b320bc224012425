use portfolio_models::contact::Submission;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactMessage {
    /// Full name of the visitor
    #[serde(default)]
    pub name: String,
    /// Email address of the visitor
    #[serde(default)]
    pub email: String,
    /// Subject of the message
    #[serde(default)]
    pub subject: String,
    /// Content of the message
    #[serde(default)]
    pub message: String,
}

impl From<ApiContactMessage> for Submission {
    fn from(value: ApiContactMessage) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}

/// Envelope returned for every contact submission that reached the
/// dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl ApiContactResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            message: Some("Email sent successfully!"),
            error: None,
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            message: None,
            error: Some("Failed to send email"),
        }
    }
}
