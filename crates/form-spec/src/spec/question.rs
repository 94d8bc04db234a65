use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rules::RuleSet;

/// Field kinds a question can map to in the linked external table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    SingleLineText,
    MultilineText,
    SingleSelect,
    MultipleSelect,
    Attachment,
}

impl QuestionType {
    /// Whether answers to this kind are checked against the option list.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            QuestionType::SingleSelect | QuestionType::MultipleSelect
        )
    }
}

/// A single question mapped to one field of the linked external table.
///
/// `field_id` references a field in that table; the mapping may go stale
/// if the table schema changes after the form was built, and is not
/// re-validated at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_key: String,
    pub field_id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select_options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_rules: Option<RuleSet>,
}
