//! In-memory collaborator implementations.
//!
//! Back the engine in tests and single-process deployments. Writes go
//! through a `tokio::sync::RwLock`; there is no cross-instance sharing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use form_spec::{Form, OwnerCredentials, SubmissionRecord};
use tokio::sync::RwLock;

use crate::error::EngineResult;
use crate::traits::{CredentialStore, FormRepository, SubmissionRepository};

#[derive(Default, Clone)]
pub struct MemoryFormRepository {
    forms: Arc<RwLock<HashMap<String, Form>>>,
}

impl MemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for MemoryFormRepository {
    async fn insert_form(&self, form: Form) -> EngineResult<()> {
        self.forms.write().await.insert(form.id.clone(), form);
        Ok(())
    }

    async fn find_form_by_id(&self, form_id: &str) -> EngineResult<Option<Form>> {
        Ok(self.forms.read().await.get(form_id).cloned())
    }

    async fn list_forms_by_owner(&self, owner_id: &str) -> EngineResult<Vec<Form>> {
        let mut forms: Vec<Form> = self
            .forms
            .read()
            .await
            .values()
            .filter(|form| form.owner_id == owner_id)
            .cloned()
            .collect();
        forms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(forms)
    }

    async fn set_published(&self, form_id: &str, published: bool) -> EngineResult<bool> {
        let mut forms = self.forms.write().await;
        match forms.get_mut(form_id) {
            Some(form) => {
                form.published = published;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default, Clone)]
pub struct MemorySubmissionRepository {
    records: Arc<RwLock<Vec<SubmissionRecord>>>,
}

impl MemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionRepository for MemorySubmissionRepository {
    async fn insert(&self, record: SubmissionRecord) -> EngineResult<String> {
        let id = record.id.clone();
        self.records.write().await.push(record);
        Ok(id)
    }

    async fn find_by_form_id(&self, form_id: &str) -> EngineResult<Vec<SubmissionRecord>> {
        // Insertion order is submission order, so newest-first is a
        // reverse scan.
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .filter(|record| record.form_id == form_id && !record.externally_deleted)
            .cloned()
            .collect())
    }

    async fn find_by_external_id(
        &self,
        external_record_id: &str,
    ) -> EngineResult<Option<SubmissionRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.external_record_id == external_record_id)
            .cloned())
    }

    async fn mark_externally_deleted(&self, external_record_id: &str) -> EngineResult<bool> {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|record| record.external_record_id == external_record_id)
        {
            Some(record) => {
                record.externally_deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default, Clone)]
pub struct MemoryCredentialStore {
    credentials: Arc<RwLock<HashMap<String, OwnerCredentials>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, credentials: OwnerCredentials) {
        self.credentials
            .write()
            .await
            .insert(credentials.owner_id.clone(), credentials);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_owner_credentials(
        &self,
        owner_id: &str,
    ) -> EngineResult<Option<OwnerCredentials>> {
        Ok(self.credentials.read().await.get(owner_id).cloned())
    }
}
