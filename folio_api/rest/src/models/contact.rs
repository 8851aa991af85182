use folio_models::contact::{ContactMessage, ContactMessageError};
use serde::Deserialize;

/// Request body of the contact form. Absent fields are treated as empty and
/// fail validation later, while fields of another JSON type are a parse
/// error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContactMessage {
    /// Full name of the user
    #[serde(default)]
    pub name: Option<String>,
    /// Email address of the user
    #[serde(default)]
    pub email: Option<String>,
    /// Subject of the message
    #[serde(default)]
    pub subject: Option<String>,
    /// Content of the message
    #[serde(default)]
    pub message: Option<String>,
}

impl TryFrom<ApiContactMessage> for ContactMessage {
    type Error = ContactMessageError;

    fn try_from(value: ApiContactMessage) -> Result<Self, Self::Error> {
        ContactMessage::new(
            value.name.unwrap_or_default(),
            value.email.unwrap_or_default(),
            value.subject.unwrap_or_default(),
            value.message.unwrap_or_default(),
        )
    }
}
