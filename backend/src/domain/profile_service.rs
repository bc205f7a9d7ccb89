//! Profile synchronization domain service.
//!
//! Presents one logical profile while persisting across the relational
//! identity store and the preference document store, and records a
//! best-effort change ledger. This service is the sole writer to the
//! document store.
//!
//! Partial-failure policy: a failed document write surfaces as a
//! persistence error with no ledger entry; a failed ledger append after a
//! successful write is logged and the update still reports success, because
//! history is diagnostic only. Same-section updates are last-write-wins.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    PreferenceDocumentRepository, PreferenceDocumentRepositoryError, ProfileHistoryError,
    ProfileHistoryRepository, ProfileService, ProfileView, UserRepository, UserRepositoryError,
};
use crate::domain::profile::{changed_fields, SectionValidationError};
use crate::domain::{
    Error, PreferenceDocument, ProfileChangeRecord, SectionPatch, User, UserId,
};

/// Profile service composing the identity and document stores.
#[derive(Clone)]
pub struct ProfileSyncService<U, D, H> {
    users: Arc<U>,
    documents: Arc<D>,
    history: Arc<H>,
}

impl<U, D, H> ProfileSyncService<U, D, H> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, documents: Arc<D>, history: Arc<H>) -> Self {
        Self {
            users,
            documents,
            history,
        }
    }
}

impl<U, D, H> ProfileSyncService<U, D, H>
where
    U: UserRepository,
    D: PreferenceDocumentRepository,
    H: ProfileHistoryRepository,
{
    fn map_user_error(error: UserRepositoryError) -> Error {
        Error::persistence(format!("identity store failure: {error}"))
    }

    fn map_document_error(error: PreferenceDocumentRepositoryError) -> Error {
        Error::persistence(format!("document store failure: {error}"))
    }

    fn map_history_error(error: ProfileHistoryError) -> Error {
        Error::persistence(format!("history store failure: {error}"))
    }

    fn map_section_error(error: SectionValidationError) -> Error {
        let code = error.code();
        Error::validation(error.to_string()).with_details(json!({ "code": code }))
    }

    async fn require_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::user_not_found("user not found"))
    }

    async fn load_document(&self, user_id: &UserId) -> Result<PreferenceDocument, Error> {
        Ok(self
            .documents
            .find(user_id)
            .await
            .map_err(Self::map_document_error)?
            .unwrap_or_else(|| PreferenceDocument::empty(Utc::now())))
    }

    /// Mirror personal-section names into the identity store.
    ///
    /// This write precedes the document write; its failure aborts the
    /// update so the two stores never diverge on the fields both hold.
    async fn fan_out_names(&self, user: &mut User, patch: &SectionPatch) -> Result<(), Error> {
        let SectionPatch::Personal(personal) = patch else {
            return Ok(());
        };
        self.users
            .update_names(
                user.id(),
                personal.first_name.clone(),
                personal.last_name.clone(),
            )
            .await
            .map_err(Self::map_user_error)?;
        user.set_names(personal.first_name.clone(), personal.last_name.clone());
        Ok(())
    }
}

#[async_trait]
impl<U, D, H> ProfileService for ProfileSyncService<U, D, H>
where
    U: UserRepository,
    D: PreferenceDocumentRepository,
    H: ProfileHistoryRepository,
{
    async fn get_profile(&self, user_id: &UserId) -> Result<ProfileView, Error> {
        let user = self.require_user(user_id).await?;
        let document = self.load_document(user_id).await?;
        Ok(ProfileView::assemble(user, document))
    }

    async fn update_section(
        &self,
        user_id: &UserId,
        patch: SectionPatch,
    ) -> Result<ProfileView, Error> {
        // Fail fast: nothing is written for an invalid patch.
        patch.validate().map_err(Self::map_section_error)?;

        let mut user = self.require_user(user_id).await?;
        self.fan_out_names(&mut user, &patch).await?;

        let section = patch.section();
        let mut document = self.load_document(user_id).await?;
        let old_value = document.section_value(section);

        let now = Utc::now();
        document.apply(patch, now);
        self.documents
            .save(user_id, &document)
            .await
            .map_err(Self::map_document_error)?;

        let new_value = document
            .section_value(section)
            .unwrap_or_else(|| json!({}));
        let records: Vec<ProfileChangeRecord> =
            changed_fields(section, old_value.as_ref(), &new_value)
                .into_iter()
                .map(|change| ProfileChangeRecord::from_change(*user_id, change, now))
                .collect();

        if !records.is_empty() {
            if let Err(err) = self.history.append(&records).await {
                // History is best-effort; the primary write already landed.
                warn!(
                    user_id = %user_id,
                    section = %section,
                    error = %err,
                    "profile change ledger append failed; history lost"
                );
            }
        }

        Ok(ProfileView::assemble(user, document))
    }

    async fn history(&self, user_id: &UserId) -> Result<Vec<ProfileChangeRecord>, Error> {
        self.history
            .list(user_id)
            .await
            .map_err(Self::map_history_error)
    }
}
