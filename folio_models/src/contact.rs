use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use thiserror::Error;

/// Shallow address check: something, an `@`, something, a dot, something.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub subject: ContactMessageSubject,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: ContactMessageAuthorEmail,
}

#[nutype(
    validate(predicate = |name| has_min_trimmed_chars(name, ContactMessageAuthorName::MIN_CHARS)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

impl ContactMessageAuthorName {
    pub const MIN_CHARS: usize = 2;
}

#[nutype(
    sanitize(trim),
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorEmail(String);

#[nutype(
    validate(predicate = |subject| has_min_trimmed_chars(subject, ContactMessageSubject::MIN_CHARS)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactMessageSubject(String);

impl ContactMessageSubject {
    pub const MIN_CHARS: usize = 5;
}

#[nutype(
    validate(predicate = |content| has_min_trimmed_chars(content, ContactMessageContent::MIN_CHARS)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

impl ContactMessageContent {
    pub const MIN_CHARS: usize = 10;
}

/// The first field of a submission that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactMessageError {
    #[error("Invalid name")]
    Name,
    #[error("Invalid email")]
    Email,
    #[error("Invalid subject")]
    Subject,
    #[error("Invalid message")]
    Message,
}

impl ContactMessage {
    /// Validates the raw fields in the order name, email, subject, message
    /// and stops at the first one that is rejected.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ContactMessageError> {
        let name = ContactMessageAuthorName::try_new(name.into())
            .map_err(|_| ContactMessageError::Name)?;
        let email = ContactMessageAuthorEmail::try_new(email.into())
            .map_err(|_| ContactMessageError::Email)?;
        let subject = ContactMessageSubject::try_new(subject.into())
            .map_err(|_| ContactMessageError::Subject)?;
        let content = ContactMessageContent::try_new(message.into())
            .map_err(|_| ContactMessageError::Message)?;

        Ok(Self {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
        })
    }
}

/// Lengths are measured in UTF-16 code units, the way browsers count them,
/// so client and server agree on every input.
fn has_min_trimmed_chars(value: &str, min: usize) -> bool {
    value.trim().encode_utf16().count() >= min
}

#[cfg(test)]
mod tests {
    use folio_utils::assert_matches;

    use super::*;

    #[test]
    fn valid_message() {
        let message =
            ContactMessage::new("Jo", "jo@x.com", "Hello there", "This is a message").unwrap();

        assert_eq!(*message.author.name, "Jo");
        assert_eq!(*message.author.email, "jo@x.com");
        assert_eq!(*message.subject, "Hello there");
        assert_eq!(*message.content, "This is a message");
    }

    #[test]
    fn name_too_short() {
        for name in ["", "J", "  J  ", "\t\n"] {
            assert_matches!(
                ContactMessage::new(name, "jo@x.com", "Hello there", "This is a message"),
                Err(ContactMessageError::Name)
            );
        }
    }

    #[test]
    fn lengths_count_utf16_units_not_bytes() {
        assert!(ContactMessageAuthorName::try_new("Zö".to_owned()).is_ok());
        assert!(ContactMessageAuthorName::try_new("ö".to_owned()).is_err());
        // a surrogate pair counts twice
        assert!(ContactMessageAuthorName::try_new("😀".to_owned()).is_ok());
        assert!(ContactMessageSubject::try_new("😀😀x".to_owned()).is_ok());
        assert!(ContactMessageSubject::try_new("😀😀".to_owned()).is_err());
        assert!(ContactMessageSubject::try_new("  Hallo  ".to_owned()).is_ok());
        assert!(ContactMessageSubject::try_new("  Hall  ".to_owned()).is_err());
    }

    #[test]
    fn untrimmed_fields_are_kept_as_submitted() {
        let message =
            ContactMessage::new(" Jo ", " jo@x.com ", " Hello there", "This is a message\n")
                .unwrap();

        assert_eq!(*message.author.name, " Jo ");
        assert_eq!(*message.author.email, "jo@x.com");
        assert_eq!(*message.subject, " Hello there");
        assert_eq!(*message.content, "This is a message\n");
    }

    #[test]
    fn email_pattern() {
        for valid in ["jo@x.com", "a.b@c.d", "weird!#$@ex.ample.org", "x@y.z.w"] {
            assert!(
                ContactMessageAuthorEmail::try_new(valid.to_owned()).is_ok(),
                "{valid} should be accepted"
            );
        }

        for invalid in ["not-an-email", "jo@x", "@x.com", "jo@.", "jo x@y.com", "jo@@x.com", ""] {
            assert!(
                ContactMessageAuthorEmail::try_new(invalid.to_owned()).is_err(),
                "{invalid} should be rejected"
            );
        }
    }

    #[test]
    fn first_invalid_field_wins() {
        assert_matches!(
            ContactMessage::new("J", "nope", "Hi", "short"),
            Err(ContactMessageError::Name)
        );
        assert_matches!(
            ContactMessage::new("Jo", "nope", "Hi", "short"),
            Err(ContactMessageError::Email)
        );
        assert_matches!(
            ContactMessage::new("Jo", "jo@x.com", "Hi", "short"),
            Err(ContactMessageError::Subject)
        );
        assert_matches!(
            ContactMessage::new("Jo", "jo@x.com", "Hello there", "short"),
            Err(ContactMessageError::Message)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(ContactMessageError::Name.to_string(), "Invalid name");
        assert_eq!(ContactMessageError::Email.to_string(), "Invalid email");
        assert_eq!(ContactMessageError::Subject.to_string(), "Invalid subject");
        assert_eq!(ContactMessageError::Message.to_string(), "Invalid message");
    }
}
