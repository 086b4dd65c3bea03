use derive_more::{AsRef, Display};

/// E-mail address, stored trimmed and lowercased so that lookups by address are exact matches.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Email(String);

impl Email {
    pub fn new(email: &str) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }

        match normalized.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Email(normalized))
            }
            _ => Err(EmailError::Invalid(normalized)),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EmailError {
    #[error("E-mail must not be empty")]
    Empty,
    #[error("Invalid e-mail address: {0}")]
    Invalid(String),
}
