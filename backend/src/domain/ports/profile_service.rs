//! Driving port for the profile synchronization layer.
//!
//! Callers see one logical profile; the implementation composes the
//! identity store and the preference document store behind this trait.

use async_trait::async_trait;

use crate::domain::{Error, PreferenceDocument, ProfileChangeRecord, SectionPatch, User, UserId};

/// The merged profile returned to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub user: User,
    pub document: PreferenceDocument,
    /// Filled required fields over total required fields, as a percentage.
    pub completion_percent: u8,
    pub onboarding_completed: bool,
}

impl ProfileView {
    /// Assemble a view, deriving the completion figures from the document.
    pub fn assemble(user: User, document: PreferenceDocument) -> Self {
        let completion_percent = document.completion_percent();
        let onboarding_completed = document.onboarding_completed();
        Self {
            user,
            document,
            completion_percent,
            onboarding_completed,
        }
    }
}

/// Domain use-case port for profile reads and section updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Fetch the merged profile; an absent document reads as defaults.
    async fn get_profile(&self, user_id: &UserId) -> Result<ProfileView, Error>;

    /// Validate and apply one section patch, then return the merged profile.
    async fn update_section(
        &self,
        user_id: &UserId,
        patch: SectionPatch,
    ) -> Result<ProfileView, Error>;

    /// Read the change ledger, oldest first.
    async fn history(&self, user_id: &UserId) -> Result<Vec<ProfileChangeRecord>, Error>;
}

/// Fixture implementation for wiring tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileService;

#[async_trait]
impl ProfileService for FixtureProfileService {
    async fn get_profile(&self, _user_id: &UserId) -> Result<ProfileView, Error> {
        Err(Error::user_not_found("user not found"))
    }

    async fn update_section(
        &self,
        _user_id: &UserId,
        _patch: SectionPatch,
    ) -> Result<ProfileView, Error> {
        Err(Error::user_not_found("user not found"))
    }

    async fn history(&self, _user_id: &UserId) -> Result<Vec<ProfileChangeRecord>, Error> {
        Ok(Vec::new())
    }
}
