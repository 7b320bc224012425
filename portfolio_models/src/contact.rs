//! Contact form submissions and their validation.
//!
//! A [`Submission`] holds the raw form fields as typed by the visitor. It can
//! only be dispatched after it has been turned into a [`ContactMessage`], which
//! happens through [`ContactMessage::try_from`]. Validation never fails with an
//! error, every problem is reported in a [`ValidationResult`].

use std::{collections::BTreeMap, sync::LazyLock};

use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::email_address::EmailAddress;

pub static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]{2,50}$").unwrap());

pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Submission {
    pub fn validate(&self) -> ValidationResult {
        match ContactMessage::try_from(self.clone()) {
            Ok(_) => ValidationResult::default(),
            Err(result) => result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub subject: ContactMessageSubject,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: EmailAddress,
}

#[nutype(
    sanitize(trim),
    validate(regex = NAME_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    sanitize(trim),
    validate(len_char_min = 3, len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageSubject(String);

#[nutype(
    sanitize(trim),
    validate(len_char_min = 10, len_char_max = 500),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

impl TryFrom<Submission> for ContactMessage {
    type Error = ValidationResult;

    fn try_from(value: Submission) -> Result<Self, Self::Error> {
        let mut result = ValidationResult::default();

        let name = result.check(
            value.name,
            FieldError::NameRequired,
            FieldError::NameInvalid,
            |name| ContactMessageAuthorName::try_new(name).ok(),
        );
        let email = result.check(
            value.email,
            FieldError::EmailRequired,
            FieldError::EmailInvalid,
            parse_email,
        );
        let subject = result.check(
            value.subject,
            FieldError::SubjectRequired,
            FieldError::SubjectInvalid,
            |subject| ContactMessageSubject::try_new(subject).ok(),
        );
        let content = result.check(
            value.message,
            FieldError::MessageRequired,
            FieldError::MessageInvalid,
            |message| ContactMessageContent::try_new(message).ok(),
        );

        match (name, email, subject, content) {
            (Some(name), Some(email), Some(subject), Some(content)) => Ok(Self {
                author: ContactMessageAuthor { name, email },
                subject,
                content,
            }),
            _ => Err(result),
        }
    }
}

/// Accepts an address only if it matches [`EMAIL_REGEX`] and also parses as a
/// mailbox address. This is stricter than the pattern alone on purpose: the
/// address becomes the reply-to header, and lettre cannot build one from
/// values like `a..b@example.com`.
fn parse_email(email: String) -> Option<EmailAddress> {
    let email = email.trim();
    EMAIL_REGEX
        .is_match(email)
        .then(|| email.parse().ok())
        .flatten()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionField {
    Name,
    Email,
    Subject,
    Message,
}

impl SubmissionField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

impl std::fmt::Display for SubmissionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be 2-50 characters long and contain only letters and spaces")]
    NameInvalid,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailInvalid,
    #[error("Subject is required")]
    SubjectRequired,
    #[error("Subject must be 3-100 characters long")]
    SubjectInvalid,
    #[error("Message is required")]
    MessageRequired,
    #[error("Message must be 10-500 characters long")]
    MessageInvalid,
}

impl FieldError {
    pub fn field(self) -> SubmissionField {
        match self {
            Self::NameRequired | Self::NameInvalid => SubmissionField::Name,
            Self::EmailRequired | Self::EmailInvalid => SubmissionField::Email,
            Self::SubjectRequired | Self::SubjectInvalid => SubmissionField::Subject,
            Self::MessageRequired | Self::MessageInvalid => SubmissionField::Message,
        }
    }
}

/// Per-field verdict of a [`Submission`]. A field without an entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    field_errors: BTreeMap<SubmissionField, FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn get(&self, field: SubmissionField) -> Option<FieldError> {
        self.field_errors.get(&field).copied()
    }

    /// Forgets the error of a single field, e.g. once the visitor starts
    /// editing it again.
    pub fn clear(&mut self, field: SubmissionField) {
        self.field_errors.remove(&field);
    }

    pub fn field_errors(&self) -> impl Iterator<Item = (SubmissionField, FieldError)> + '_ {
        self.field_errors.iter().map(|(&field, &error)| (field, error))
    }

    fn check<T>(
        &mut self,
        value: String,
        required: FieldError,
        invalid: FieldError,
        parse: impl FnOnce(String) -> Option<T>,
    ) -> Option<T> {
        let error = if value.trim().is_empty() {
            required
        } else if let Some(parsed) = parse(value) {
            return Some(parsed);
        } else {
            invalid
        };

        self.field_errors.insert(error.field(), error);
        None
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            return f.write_str("valid");
        }

        for (i, (field, error)) in self.field_errors().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use portfolio_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn submission() -> Submission {
        Submission {
            name: "Jane Doe".into(),
            email: "jane.doe@example.com".into(),
            subject: "Collaboration".into(),
            message: "Hi, I would like to work with you!".into(),
        }
    }

    #[test]
    fn valid_submission() {
        let result = submission().validate();

        assert!(result.is_valid());
        assert_eq!(result.field_errors().count(), 0);
        assert_eq!(result.to_string(), "valid");
    }

    #[test]
    fn valid_submission_is_trimmed() {
        let message = ContactMessage::try_from(Submission {
            name: "  Jane Doe ".into(),
            email: " jane.doe@example.com\n".into(),
            subject: "\tCollaboration ".into(),
            message: "  Hi, I would like to work with you!  ".into(),
        })
        .unwrap();

        assert_eq!(*message.author.name, "Jane Doe");
        assert_eq!(message.author.email.as_str(), "jane.doe@example.com");
        assert_eq!(*message.subject, "Collaboration");
        assert_eq!(*message.content, "Hi, I would like to work with you!");
    }

    #[test]
    fn missing_fields_are_required() {
        let result = Submission {
            name: "   ".into(),
            email: String::new(),
            subject: "\n".into(),
            message: " \t ".into(),
        }
        .validate();

        assert!(!result.is_valid());
        assert_eq!(
            result.field_errors().collect::<Vec<_>>(),
            [
                (SubmissionField::Name, FieldError::NameRequired),
                (SubmissionField::Email, FieldError::EmailRequired),
                (SubmissionField::Subject, FieldError::SubjectRequired),
                (SubmissionField::Message, FieldError::MessageRequired),
            ]
        );
        assert_eq!(FieldError::NameRequired.to_string(), "Name is required");
    }

    #[test]
    fn name_rules() {
        let longest = "a".repeat(50);
        let too_long = "a".repeat(51);
        for (name, valid) in [
            ("Jane Doe", true),
            ("Jo", true),
            ("J", false),
            ("Jane2", false),
            ("Jane-Doe", false),
            ("Jane Doe!", false),
            (longest.as_str(), true),
            (too_long.as_str(), false),
        ] {
            let result = Submission {
                name: name.into(),
                ..submission()
            }
            .validate();
            let expected = (!valid).then_some(FieldError::NameInvalid);
            assert_eq!(result.get(SubmissionField::Name), expected, "{name:?}");
        }
    }

    #[test]
    fn email_rules() {
        for (email, valid) in [
            ("foo@bar.com", true),
            ("first.last+tag@sub.example.org", true),
            ("foo@bar", false),
            ("foo.bar.com", false),
            ("foo@bar.c", false),
            ("foo bar@baz.com", false),
        ] {
            let result = Submission {
                email: email.into(),
                ..submission()
            }
            .validate();
            let expected = (!valid).then_some(FieldError::EmailInvalid);
            assert_eq!(result.get(SubmissionField::Email), expected, "{email:?}");
        }
    }

    #[test]
    fn email_must_be_a_mailbox_address() {
        for email in [
            "foo@bar..com",
            "a..b@example.com",
            ".a@example.com",
            "foo@-bar.com",
        ] {
            assert!(EMAIL_REGEX.is_match(email), "{email:?}");

            let result = Submission {
                email: email.into(),
                ..submission()
            }
            .validate();
            assert_eq!(
                result.get(SubmissionField::Email),
                Some(FieldError::EmailInvalid),
                "{email:?}"
            );
        }
    }

    #[test]
    fn subject_rules() {
        let longest = "x".repeat(100);
        let too_long = "x".repeat(101);
        for (subject, valid) in [
            ("Hey", true),
            ("Hi", false),
            ("Hi!", true),
            (longest.as_str(), true),
            (too_long.as_str(), false),
        ] {
            let result = Submission {
                subject: subject.into(),
                ..submission()
            }
            .validate();
            let expected = (!valid).then_some(FieldError::SubjectInvalid);
            assert_eq!(result.get(SubmissionField::Subject), expected, "{subject:?}");
        }
    }

    #[test]
    fn message_length_bounds_are_inclusive() {
        for (message, valid) in [
            ("x".repeat(9), false),
            ("x".repeat(10), true),
            ("é".repeat(10), true),
            ("x".repeat(500), true),
            ("x".repeat(501), false),
            ("line one\nline two".into(), true),
        ] {
            let result = Submission {
                message: message.clone(),
                ..submission()
            }
            .validate();
            let expected = (!valid).then_some(FieldError::MessageInvalid);
            assert_eq!(result.get(SubmissionField::Message), expected, "{message:?}");
        }
    }

    #[test]
    fn try_from_returns_all_errors() {
        let result = ContactMessage::try_from(Submission {
            name: "Jane2".into(),
            email: "foo@bar".into(),
            ..submission()
        });

        assert_matches!(&result, Err(result) if result.field_errors().count() == 2);
        let result = result.unwrap_err();
        assert_eq!(
            result.to_string(),
            "name: Name must be 2-50 characters long and contain only letters and spaces; \
             email: Please enter a valid email address"
        );
    }

    #[test]
    fn clear_field_error() {
        let mut result = Submission {
            name: String::new(),
            ..submission()
        }
        .validate();
        assert_eq!(result.get(SubmissionField::Name), Some(FieldError::NameRequired));

        result.clear(SubmissionField::Name);

        assert_eq!(result.get(SubmissionField::Name), None);
        assert!(result.is_valid());
    }

    #[test]
    fn field_names() {
        assert_eq!(
            SubmissionField::ALL.map(SubmissionField::as_str),
            ["name", "email", "subject", "message"]
        );
        assert_eq!(
            serde_json::to_string(&SubmissionField::Message).unwrap(),
            "\"message\""
        );
    }
}
