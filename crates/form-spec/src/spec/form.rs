use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Question;

/// Top-level form definition owned by one account.
///
/// A form exclusively owns its questions and their rule sets; question
/// keys are unique within a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub base_id: String,
    pub table_id: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub published: bool,
}

impl Form {
    /// Look up a question by its key.
    pub fn question(&self, key: &str) -> Option<&Question> {
        self.questions
            .iter()
            .find(|question| question.question_key == key)
    }
}
