use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw answers keyed by question key. Built up as the respondent types,
/// consumed once at submission.
pub type AnswerSet = Map<String, Value>;

/// Blank means the respondent has effectively not answered: the key is
/// missing, explicitly null, or an empty string. Rules and validation
/// share this single definition.
pub fn is_blank(answer: Option<&Value>) -> bool {
    match answer {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

/// First validation violation found, carrying the offending question's
/// label in a respondent-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{label} is required")]
    MissingRequired { label: String },
    #[error("Invalid value for {label}")]
    InvalidOption { label: String },
    #[error("{label} must be an array")]
    NotAnArray { label: String },
}

impl ValidationError {
    /// Label of the question that failed.
    pub fn label(&self) -> &str {
        match self {
            ValidationError::MissingRequired { label }
            | ValidationError::InvalidOption { label }
            | ValidationError::NotAnArray { label } => label,
        }
    }
}

/// Immutable snapshot persisted once the external write succeeded.
///
/// Never mutated afterwards except to set `externally_deleted` when the
/// mirrored record is removed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: String,
    pub form_id: String,
    pub external_record_id: String,
    pub answers: AnswerSet,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub externally_deleted: bool,
}

/// Access credentials a form owner holds for the linked external account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerCredentials {
    pub owner_id: String,
    pub access_token: String,
}
