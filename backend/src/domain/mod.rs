//! Domain aggregates, services, and ports.
//!
//! Purpose: define the strongly typed entities and use-cases shared by the
//! HTTP and persistence adapters. Types here are transport agnostic; each
//! documents its invariants and serde contract in Rustdoc.

pub mod error;
pub mod history;
pub mod identity_service;
pub mod pantry;
pub mod pantry_service;
pub mod password;
pub mod ports;
pub mod profile;
pub mod profile_service;
pub mod recipe_service;
pub mod recipes;
pub mod tokens;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::history::ProfileChangeRecord;
pub use self::identity_service::IdentityService;
pub use self::pantry::{PantryItem, PantryItemDraft, PantryStats};
pub use self::pantry_service::PantryTrackerService;
pub use self::profile::{PreferenceDocument, ProfileSection, SectionPatch};
pub use self::profile_service::ProfileSyncService;
pub use self::recipe_service::RecipeBoxService;
pub use self::recipes::{Category, Recipe, RecipeContent, UserRecipe};
pub use self::tokens::{IssuedToken, SessionTokens, VerificationToken};
pub use self::user::{Email, User, UserId, UserValidationError, Username};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
