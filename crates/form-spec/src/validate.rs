use serde_json::Value;

use crate::answers::{AnswerSet, ValidationError, is_blank};
use crate::spec::question::{Question, QuestionType};

/// Check the submitted answers against the currently visible questions,
/// stopping at the first violation found.
///
/// Questions filtered out by visibility resolution are never validated;
/// a hidden required question with a blank answer is not an error. Only
/// select kinds get option-membership checks; other kinds accept any
/// present value.
pub fn validate(answers: &AnswerSet, visible: &[&Question]) -> Result<(), ValidationError> {
    for question in visible {
        let answer = answers.get(&question.question_key);

        if question.required && is_blank(answer) {
            return Err(ValidationError::MissingRequired {
                label: question.label.clone(),
            });
        }

        let Some(answer) = answer else {
            continue;
        };
        if is_blank(Some(answer)) {
            continue;
        }

        match question.kind {
            QuestionType::SingleSelect => {
                if !option_member(question, answer) {
                    return Err(ValidationError::InvalidOption {
                        label: question.label.clone(),
                    });
                }
            }
            QuestionType::MultipleSelect => {
                let Value::Array(values) = answer else {
                    return Err(ValidationError::NotAnArray {
                        label: question.label.clone(),
                    });
                };
                if values.iter().any(|value| !option_member(question, value)) {
                    return Err(ValidationError::InvalidOption {
                        label: question.label.clone(),
                    });
                }
            }
            QuestionType::SingleLineText
            | QuestionType::MultilineText
            | QuestionType::Attachment => {}
        }
    }

    Ok(())
}

fn option_member(question: &Question, value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|text| question.select_options.iter().any(|option| option == text))
}
