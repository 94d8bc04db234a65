use std::collections::HashSet;
use std::sync::Arc;

use form_spec::{Form, Question, SubmissionRecord};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::traits::{FormRepository, SubmissionRepository};

/// Payload accepted when an owner creates a form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_id: String,
    pub table_id: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Owner-side form management plus the submission bookkeeping that hangs
/// off a form: listing responses and syncing upstream deletions.
pub struct FormService {
    forms: Arc<dyn FormRepository>,
    submissions: Arc<dyn SubmissionRepository>,
}

impl FormService {
    pub fn new(forms: Arc<dyn FormRepository>, submissions: Arc<dyn SubmissionRepository>) -> Self {
        Self { forms, submissions }
    }

    /// Create a form for an owner. New forms start unpublished.
    pub async fn create_form(&self, owner_id: &str, new_form: NewForm) -> EngineResult<Form> {
        check_questions(&new_form.questions)?;

        let form = Form {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: new_form.name,
            description: new_form.description,
            base_id: new_form.base_id,
            table_id: new_form.table_id,
            questions: new_form.questions,
            published: false,
        };
        self.forms.insert_form(form.clone()).await?;
        Ok(form)
    }

    pub async fn form_by_id(&self, form_id: &str) -> EngineResult<Form> {
        self.forms
            .find_form_by_id(form_id)
            .await?
            .ok_or_else(|| EngineError::FormNotFound(form_id.to_string()))
    }

    pub async fn list_forms(&self, owner_id: &str) -> EngineResult<Vec<Form>> {
        self.forms.list_forms_by_owner(owner_id).await
    }

    pub async fn set_published(&self, form_id: &str, published: bool) -> EngineResult<()> {
        if self.forms.set_published(form_id, published).await? {
            Ok(())
        } else {
            Err(EngineError::FormNotFound(form_id.to_string()))
        }
    }

    /// Submissions for a form, newest first, excluding records deleted
    /// upstream.
    pub async fn submissions_for_form(
        &self,
        form_id: &str,
    ) -> EngineResult<Vec<SubmissionRecord>> {
        self.submissions.find_by_form_id(form_id).await
    }

    /// Webhook entry point: the external side reports a removed record.
    /// Unknown record ids are a no-op, not an error.
    pub async fn record_external_deletion(&self, external_record_id: &str) -> EngineResult<bool> {
        let marked = self
            .submissions
            .mark_externally_deleted(external_record_id)
            .await?;
        if !marked {
            tracing::debug!(
                external_record_id,
                "deletion notification for unknown record"
            );
        }
        Ok(marked)
    }
}

fn check_questions(questions: &[Question]) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for question in questions {
        if !seen.insert(question.question_key.as_str()) {
            return Err(EngineError::InvalidForm(format!(
                "duplicate question key '{}'",
                question.question_key
            )));
        }
        if question.kind.has_options() && question.select_options.is_empty() {
            return Err(EngineError::InvalidForm(format!(
                "question '{}' needs at least one select option",
                question.question_key
            )));
        }
    }
    Ok(())
}
