//! Collaborator interfaces the engine drives.
//!
//! Storage, credentials, and the external table API are consumed through
//! these seams; the engine never talks to a concrete backend directly.
//! All implementations must be `Send + Sync` for use across async tasks.

use async_trait::async_trait;
use form_spec::{Form, OwnerCredentials, SubmissionRecord};
use serde_json::{Map, Value};

use crate::error::EngineResult;

/// Read access to form owners' stored external-account credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_owner_credentials(
        &self,
        owner_id: &str,
    ) -> EngineResult<Option<OwnerCredentials>>;
}

/// Write access to the external tabular store submissions mirror into.
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Create one record in the given table; returns the external record
    /// id assigned upstream.
    async fn write_record(
        &self,
        credentials: &OwnerCredentials,
        base_id: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> EngineResult<String>;
}

/// Durable store for form definitions.
#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn insert_form(&self, form: Form) -> EngineResult<()>;
    async fn find_form_by_id(&self, form_id: &str) -> EngineResult<Option<Form>>;
    async fn list_forms_by_owner(&self, owner_id: &str) -> EngineResult<Vec<Form>>;
    /// Returns false when no form with that id exists.
    async fn set_published(&self, form_id: &str, published: bool) -> EngineResult<bool>;
}

/// Durable store for submission snapshots.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Persist an immutable snapshot; returns the stored record's id.
    async fn insert(&self, record: SubmissionRecord) -> EngineResult<String>;
    /// Most recent first, excluding records whose external counterpart
    /// was deleted.
    async fn find_by_form_id(&self, form_id: &str) -> EngineResult<Vec<SubmissionRecord>>;
    async fn find_by_external_id(
        &self,
        external_record_id: &str,
    ) -> EngineResult<Option<SubmissionRecord>>;
    /// Flag the record whose external counterpart was removed. Returns
    /// false when the id matches nothing.
    async fn mark_externally_deleted(&self, external_record_id: &str) -> EngineResult<bool>;
}
