use folio_models::contact::{
    ContactMessageAuthorEmail, ContactMessageAuthorName, ContactMessageContent,
    ContactMessageSubject,
};
use thiserror::Error;

use crate::ContactFormFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Please enter your name")]
    NameMissing,
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Please enter your email")]
    EmailMissing,
    #[error("Please enter a valid email")]
    EmailInvalid,
    #[error("Please enter a subject")]
    SubjectMissing,
    #[error("Subject must be at least 5 characters")]
    SubjectTooShort,
    #[error("Please enter your message")]
    MessageMissing,
    #[error("Message must be at least 10 characters")]
    MessageTooShort,
}

/// Per-field validation result. Every invalid field is reported, not just
/// the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<FieldError>,
    pub email: Option<FieldError>,
    pub subject: Option<FieldError>,
    pub message: Option<FieldError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Field name and error, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FieldError)> + '_ {
        [
            ("name", self.name),
            ("email", self.email),
            ("subject", self.subject),
            ("message", self.message),
        ]
        .into_iter()
        .filter_map(|(field, error)| error.map(|error| (field, error)))
    }
}

/// Apply the same rules as the server, so an invalid form never costs a
/// network call.
pub fn validate(fields: &ContactFormFields) -> FieldErrors {
    FieldErrors {
        name: check(
            &fields.name,
            FieldError::NameMissing,
            FieldError::NameTooShort,
            |x| ContactMessageAuthorName::try_new(x).is_ok(),
        ),
        email: check(
            &fields.email,
            FieldError::EmailMissing,
            FieldError::EmailInvalid,
            |x| ContactMessageAuthorEmail::try_new(x).is_ok(),
        ),
        subject: check(
            &fields.subject,
            FieldError::SubjectMissing,
            FieldError::SubjectTooShort,
            |x| ContactMessageSubject::try_new(x).is_ok(),
        ),
        message: check(
            &fields.message,
            FieldError::MessageMissing,
            FieldError::MessageTooShort,
            |x| ContactMessageContent::try_new(x).is_ok(),
        ),
    }
}

fn check(
    value: &str,
    missing: FieldError,
    invalid: FieldError,
    valid: impl FnOnce(String) -> bool,
) -> Option<FieldError> {
    if value.trim().is_empty() {
        Some(missing)
    } else if !valid(value.to_owned()) {
        Some(invalid)
    } else {
        None
    }
}
