use serde_json::Value;

use crate::answers::{AnswerSet, is_blank};
use crate::spec::form::Form;
use crate::spec::question::{Question, QuestionType};
use crate::visibility::{VisibilityMap, visibility_map};

/// Status labels for a live form view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// More input is required.
    NeedInput,
    /// All visible questions are filled.
    Complete,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
        }
    }
}

/// Progress counters over the currently visible questions.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    pub answered: usize,
    pub total: usize,
}

/// Describes a single question for render outputs.
#[derive(Debug, Clone)]
pub struct RenderQuestion {
    pub key: String,
    pub label: String,
    pub kind: QuestionType,
    pub required: bool,
    pub options: Vec<String>,
    pub visible: bool,
    pub current_value: Option<Value>,
}

/// Snapshot of the respondent-facing form state, recomputed from scratch
/// on every answer change.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub form_id: String,
    pub form_name: String,
    pub status: RenderStatus,
    pub next_question_key: Option<String>,
    pub progress: RenderProgress,
    pub questions: Vec<RenderQuestion>,
}

/// First visible question whose answer is still blank, in form order.
pub fn next_question<'a>(
    questions: &'a [Question],
    answers: &AnswerSet,
    visibility: &VisibilityMap,
) -> Option<&'a Question> {
    questions.iter().find(|question| {
        visibility
            .get(&question.question_key)
            .copied()
            .unwrap_or(true)
            && is_blank(answers.get(&question.question_key))
    })
}

/// Build the render payload from the form and the answers so far.
pub fn build_render_payload(form: &Form, answers: &AnswerSet) -> RenderPayload {
    let visibility = visibility_map(&form.questions, answers);
    let next = next_question(&form.questions, answers, &visibility);

    let total = visibility.values().filter(|visible| **visible).count();
    let answered = form
        .questions
        .iter()
        .filter(|question| {
            visibility
                .get(&question.question_key)
                .copied()
                .unwrap_or(true)
                && !is_blank(answers.get(&question.question_key))
        })
        .count();

    let questions = form
        .questions
        .iter()
        .map(|question| RenderQuestion {
            key: question.question_key.clone(),
            label: question.label.clone(),
            kind: question.kind,
            required: question.required,
            options: question.select_options.clone(),
            visible: visibility
                .get(&question.question_key)
                .copied()
                .unwrap_or(true),
            current_value: answers.get(&question.question_key).cloned(),
        })
        .collect::<Vec<_>>();

    let status = if next.is_some() {
        RenderStatus::NeedInput
    } else {
        RenderStatus::Complete
    };

    RenderPayload {
        form_id: form.id.clone(),
        form_name: form.name.clone(),
        status,
        next_question_key: next.map(|question| question.question_key.clone()),
        progress: RenderProgress { answered, total },
        questions,
    }
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {} ({})", payload.form_name, payload.form_id));
    lines.push(format!(
        "Status: {} ({}/{})",
        payload.status.as_str(),
        payload.progress.answered,
        payload.progress.total
    ));

    if let Some(next_key) = &payload.next_question_key {
        lines.push(format!("Next question: {}", next_key));
    } else {
        lines.push("All visible questions are answered.".to_string());
    }

    lines.push("Visible questions:".to_string());
    for question in payload.questions.iter().filter(|question| question.visible) {
        let mut entry = format!(" - {} ({})", question.key, question.label);
        if question.required {
            entry.push_str(" [required]");
        }
        if let Some(current_value) = &question.current_value {
            entry.push_str(&format!(" = {}", value_to_display(current_value)));
        }
        lines.push(entry);
    }

    lines.join("\n")
}

pub(crate) fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_display)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
