use form_spec::{QuestionType, RenderPayload, RenderQuestion, RenderStatus};
use serde_json::Value;

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: question prompts only.
    Clean,
    /// Verbose output: status, visible questions, error details.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints prompts and state once the loop yields a question.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self, payload: &RenderPayload) {
        if self.header_printed {
            return;
        }
        println!("Form: {}", payload.form_name);
        self.header_printed = true;
    }

    pub fn show_status(&self, payload: &RenderPayload) {
        if self.verbosity.is_verbose() {
            println!(
                "Status: {} ({}/{})",
                payload.status.as_str(),
                payload.progress.answered,
                payload.progress.total
            );
            self.print_visible_questions(payload);
        } else if payload.status == RenderStatus::NeedInput && visible_count(payload) == 0 {
            println!("No visible questions are available; check your conditional logic.");
        }
    }

    fn print_visible_questions(&self, payload: &RenderPayload) {
        println!("Visible questions:");
        for question in payload.questions.iter().filter(|question| question.visible) {
            let mut entry = format!(" - {} ({})", question.key, question.label);
            if question.required {
                entry.push_str(" [required]");
            }
            println!("{}", entry);
        }
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = if prompt.total > 0 {
            format!("{}/{} {}", prompt.index, prompt.total, prompt.label)
        } else {
            format!("{} {}", prompt.index, prompt.label)
        };
        if prompt.required {
            line.push_str(" *");
        }
        if let Some(hint) = &prompt.hint {
            line.push(' ');
            line.push_str(hint);
        }
        println!("{}", line);
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            eprintln!("  Expected: {}", debug);
        }
    }
}

fn visible_count(payload: &RenderPayload) -> usize {
    payload
        .questions
        .iter()
        .filter(|question| question.visible)
        .count()
}

/// Context used to format a single prompt.
pub struct PromptContext {
    pub index: usize,
    pub total: usize,
    pub label: String,
    pub required: bool,
    pub hint: Option<String>,
}

impl PromptContext {
    pub fn new(question: &RenderQuestion, answered: usize, total: usize) -> Self {
        Self {
            index: (answered + 1).max(1),
            total,
            label: question.label.clone(),
            required: question.required,
            hint: hint_for(question),
        }
    }
}

fn hint_for(question: &RenderQuestion) -> Option<String> {
    match question.kind {
        QuestionType::SingleSelect if !question.options.is_empty() => {
            Some(format!("({})", question.options.join("/")))
        }
        QuestionType::MultipleSelect if !question.options.is_empty() => {
            Some(format!("(comma-separated: {})", question.options.join(", ")))
        }
        QuestionType::Attachment => Some("(file URL)".to_string()),
        _ => None,
    }
}

/// Error produced when parsing an answer typed by the respondent.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// Parse one line of input for a question. `Ok(None)` means the
/// respondent left an optional question blank.
pub fn parse_answer(
    question: &RenderQuestion,
    input: &str,
) -> Result<Option<Value>, AnswerParseError> {
    let input = input.trim();
    if input.is_empty() {
        return if question.required {
            Err(AnswerParseError::new(
                format!("{} is required", question.label),
                None,
            ))
        } else {
            Ok(None)
        };
    }

    match question.kind {
        QuestionType::SingleLineText | QuestionType::MultilineText | QuestionType::Attachment => {
            Ok(Some(Value::String(input.to_string())))
        }
        QuestionType::SingleSelect => {
            if question.options.iter().any(|option| option == input) {
                Ok(Some(Value::String(input.to_string())))
            } else {
                Err(AnswerParseError::new(
                    format!("'{}' is not one of the options", input),
                    Some(question.options.join(", ")),
                ))
            }
        }
        QuestionType::MultipleSelect => {
            let values: Vec<String> = input
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect();
            if let Some(unknown) = values
                .iter()
                .find(|value| !question.options.iter().any(|option| option == *value))
            {
                return Err(AnswerParseError::new(
                    format!("'{}' is not one of the options", unknown),
                    Some(question.options.join(", ")),
                ));
            }
            Ok(Some(Value::Array(
                values.into_iter().map(Value::String).collect(),
            )))
        }
    }
}
