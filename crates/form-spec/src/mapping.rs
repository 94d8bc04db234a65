use serde_json::{Map, Value};

use crate::answers::AnswerSet;
use crate::spec::question::Question;

/// Build the external record for a submission, keyed by external field
/// id.
///
/// Iterates all questions of the form, not just the visible ones: a
/// hidden question still carrying a leftover answer is forwarded as-is.
/// Validation and mapping deliberately operate over different question
/// subsets. Absent answers are omitted entirely, never mapped as null.
pub fn map_to_external_record(answers: &AnswerSet, questions: &[Question]) -> Map<String, Value> {
    let mut record = Map::new();
    for question in questions {
        if let Some(value) = answers.get(&question.question_key) {
            record.insert(question.field_id.clone(), value.clone());
        }
    }
    record
}
