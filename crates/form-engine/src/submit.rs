use std::sync::Arc;

use chrono::Utc;
use form_spec::{AnswerSet, SubmissionRecord, map_to_external_record, resolve_visible, validate};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::traits::{CredentialStore, FormRepository, SubmissionRepository, TableClient};

/// Identifiers returned for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub local_record_id: String,
    pub external_record_id: String,
}

/// Runs the submission pipeline against the configured collaborators.
///
/// Steps are awaited strictly in sequence; each one gates the next.
/// Independent submissions share no state and may run fully in parallel.
pub struct SubmissionEngine {
    forms: Arc<dyn FormRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    credentials: Arc<dyn CredentialStore>,
    table_client: Arc<dyn TableClient>,
}

impl SubmissionEngine {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        credentials: Arc<dyn CredentialStore>,
        table_client: Arc<dyn TableClient>,
    ) -> Self {
        Self {
            forms,
            submissions,
            credentials,
            table_client,
        }
    }

    /// Authoritative submission path: visibility, validation, mapping,
    /// the external write, then the local snapshot.
    ///
    /// The external write is the source-of-truth reference: nothing is
    /// persisted locally until it has succeeded, so an upstream failure
    /// leaves no orphaned local record. The reverse gap is accepted: if
    /// the local insert fails after the write, the external record
    /// already exists and the error is surfaced to the caller.
    pub async fn submit(
        &self,
        form_id: &str,
        answers: &AnswerSet,
    ) -> EngineResult<SubmissionReceipt> {
        let form = self
            .forms
            .find_form_by_id(form_id)
            .await?
            .ok_or_else(|| EngineError::FormNotFound(form_id.to_string()))?;

        let visible = resolve_visible(&form.questions, answers);
        validate(answers, &visible)?;

        let credentials = self
            .credentials
            .find_owner_credentials(&form.owner_id)
            .await?
            .ok_or_else(|| EngineError::OwnerNotFound(form.owner_id.clone()))?;

        // Mapping runs over all questions, not the visible subset.
        let fields = map_to_external_record(answers, &form.questions);
        tracing::debug!(
            form_id,
            field_count = fields.len(),
            "writing submission to external table"
        );
        let external_record_id = self
            .table_client
            .write_record(&credentials, &form.base_id, &form.table_id, fields)
            .await?;

        let record = SubmissionRecord {
            id: Uuid::new_v4().to_string(),
            form_id: form.id.clone(),
            external_record_id: external_record_id.clone(),
            answers: answers.clone(),
            submitted_at: Utc::now(),
            externally_deleted: false,
        };
        let local_record_id = match self.submissions.insert(record).await {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(
                    form_id,
                    %external_record_id,
                    error = %err,
                    "external record written but local persistence failed"
                );
                return Err(err);
            }
        };

        Ok(SubmissionReceipt {
            local_record_id,
            external_record_id,
        })
    }
}
