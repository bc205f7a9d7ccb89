//! Domain ports and supporting types for the hexagonal boundary.

mod account_service;
mod categories;
mod mailer;
mod pantry_repository;
mod pantry_service;
mod preference_documents;
mod profile_history;
mod profile_service;
mod recipe_catalog;
mod recipe_service;
mod user_recipes;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{
    AccountService, AuthenticatedAccount, FixtureAccountService, RegisterRequest,
    SocialLoginRequest,
};
#[cfg(test)]
pub use categories::MockCategoryRepository;
pub use categories::{CategoryRepository, CategoryRepositoryError, FixtureCategoryRepository};
#[cfg(test)]
pub use mailer::MockVerificationMailer;
pub use mailer::{FixtureVerificationMailer, MailerError, VerificationMailer};
#[cfg(test)]
pub use pantry_repository::MockPantryRepository;
pub use pantry_repository::{FixturePantryRepository, PantryRepository, PantryRepositoryError};
#[cfg(test)]
pub use pantry_service::MockPantryService;
pub use pantry_service::{FixturePantryService, PantryService};
#[cfg(test)]
pub use preference_documents::MockPreferenceDocumentRepository;
pub use preference_documents::{
    FixturePreferenceDocumentRepository, PreferenceDocumentRepository,
    PreferenceDocumentRepositoryError,
};
#[cfg(test)]
pub use profile_history::MockProfileHistoryRepository;
pub use profile_history::{
    FixtureProfileHistoryRepository, ProfileHistoryError, ProfileHistoryRepository,
};
#[cfg(test)]
pub use profile_service::MockProfileService;
pub use profile_service::{FixtureProfileService, ProfileService, ProfileView};
#[cfg(test)]
pub use recipe_catalog::MockRecipeCatalogRepository;
pub use recipe_catalog::{
    FixtureRecipeCatalogRepository, RecipeCatalogError, RecipeCatalogRepository,
};
#[cfg(test)]
pub use recipe_service::MockRecipeService;
pub use recipe_service::{FixtureRecipeService, RecipeService};
#[cfg(test)]
pub use user_recipes::MockUserRecipeRepository;
pub use user_recipes::{FixtureUserRecipeRepository, UserRecipeRepository, UserRecipeRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, NewUserRecord, StoredCredentials, UserRepository, UserRepositoryError,
};
