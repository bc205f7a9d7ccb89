//! OpenAPI document assembled from the annotated handlers.

use utoipa::OpenApi;

use crate::domain::error::{Error, ErrorCode};
use crate::domain::history::ProfileChangeRecord;
use crate::domain::pantry::{CategoryCount, PantryItem, PantryItemDraft, PantryStats};
use crate::domain::profile::{
    BudgetSection, CookingExperience, CookingSection, DietarySection, NutritionalSection,
    PersonalSection, PreferenceDocument, ProfileSection, SectionPatch,
};
use crate::domain::recipes::{
    Category, Ingredient, NutritionFacts, Recipe, RecipeContent, UserRecipe,
};
use crate::domain::user::User;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::pantry;
use crate::inbound::http::profile::{self, PersonalInfoBody, ProfileResponse};
use crate::inbound::http::recipes::{self, CategoryBody};
use crate::inbound::http::users::{
    self, AccountResponse, LoginBody, RegisterBody, SocialLoginBody, VerifyEmailBody,
};
use crate::inbound::http::health;

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Foodi API",
        description = "Meal-planning backend: accounts, profiles, recipes, pantry.",
    ),
    paths(
        users::register,
        users::login,
        users::social_login,
        users::verify_email,
        profile::get_profile,
        profile::update_profile,
        profile::update_section,
        profile::get_history,
        recipes::browse_catalog,
        recipes::list_saved,
        recipes::create_custom,
        recipes::update_custom,
        recipes::delete_saved,
        recipes::favorite,
        recipes::unfavorite,
        recipes::list_categories,
        recipes::create_category,
        recipes::delete_category,
        recipes::assign_category,
        recipes::unassign_category,
        pantry::add_item,
        pantry::list_items,
        pantry::stats,
        pantry::expiring,
        pantry::cleanup,
        pantry::get_item,
        pantry::update_item,
        pantry::delete_item,
        health::ready,
        health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ErrorEnvelope,
        User,
        RegisterBody,
        LoginBody,
        SocialLoginBody,
        VerifyEmailBody,
        AccountResponse,
        ProfileResponse,
        PersonalInfoBody,
        ProfileSection,
        SectionPatch,
        PreferenceDocument,
        DietarySection,
        BudgetSection,
        CookingSection,
        CookingExperience,
        NutritionalSection,
        PersonalSection,
        ProfileChangeRecord,
        Recipe,
        RecipeContent,
        Ingredient,
        NutritionFacts,
        UserRecipe,
        Category,
        CategoryBody,
        PantryItem,
        PantryItemDraft,
        PantryStats,
        CategoryCount,
    )),
    tags(
        (name = "users", description = "Registration, authentication, verification"),
        (name = "profile", description = "Merged profile and section updates"),
        (name = "recipes", description = "Catalog, favorites, custom recipes, categories"),
        (name = "pantry", description = "Pantry tracking"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn document_includes_every_surface() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/users/register",
            "/api/v1/users/login",
            "/api/v1/users/profile/section",
            "/api/v1/users/profile/history",
            "/api/v1/pantry/stats",
            "/healthz/ready",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path: {expected}"
            );
        }
    }
}
