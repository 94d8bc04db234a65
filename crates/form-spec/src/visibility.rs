use std::collections::BTreeMap;

use crate::answers::AnswerSet;
use crate::rules::should_show;
use crate::spec::question::Question;

pub type VisibilityMap = BTreeMap<String, bool>;

/// Visibility of every question keyed by question key.
///
/// A rule may reference a question that is itself hidden, or one that
/// appears later in the form; the evaluation simply reads whatever value
/// currently sits in the answer set. No cycle detection is performed.
pub fn visibility_map(questions: &[Question], answers: &AnswerSet) -> VisibilityMap {
    let mut map = VisibilityMap::new();
    for question in questions {
        map.insert(
            question.question_key.clone(),
            should_show(question.conditional_rules.as_ref(), answers),
        );
    }
    map
}

/// The ordered subset of questions currently shown to the respondent.
///
/// Pure: neither input is mutated, and the original question order is
/// preserved. Used both for live re-rendering on every answer change and
/// as the authoritative gate at submission time.
pub fn resolve_visible<'a>(questions: &'a [Question], answers: &AnswerSet) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|question| should_show(question.conditional_rules.as_ref(), answers))
        .collect()
}
