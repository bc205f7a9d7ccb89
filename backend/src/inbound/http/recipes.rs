//! Recipe API handlers.
//!
//! ```text
//! GET  /api/v1/recipes
//! GET|POST /api/v1/users/recipes
//! PUT|DELETE /api/v1/users/recipes/{id}
//! POST|DELETE /api/v1/users/recipes/favorites/{recipe_id}
//! GET|POST /api/v1/users/categories
//! DELETE /api/v1/users/categories/{id}
//! PUT|DELETE /api/v1/users/recipes/{id}/categories/{category_id}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::recipe_service::CATALOG_DEFAULT_LIMIT;
use crate::domain::RecipeContent;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;
use crate::inbound::http::ApiResult;

/// Query parameters for catalog browsing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    /// Name/ingredient search term.
    pub query: Option<String>,
    /// Page size; clamped server-side.
    pub limit: Option<i64>,
}

/// Request body for creating a category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBody {
    pub name: Option<String>,
}

/// Browse the shared recipe catalog.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Catalog recipes"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["recipes"],
    operation_id = "browseCatalog"
)]
#[get("/recipes")]
pub async fn browse_catalog(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    query: web::Query<CatalogQuery>,
) -> ApiResult<HttpResponse> {
    let params = query.into_inner();
    let recipes = state
        .recipes
        .browse_catalog(params.query, params.limit.unwrap_or(CATALOG_DEFAULT_LIMIT))
        .await?;
    Ok(HttpResponse::Ok().json(recipes))
}

/// List the authenticated user's saved recipes.
#[utoipa::path(
    get,
    path = "/api/v1/users/recipes",
    responses(
        (status = 200, description = "Saved recipes"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["recipes"],
    operation_id = "listSavedRecipes"
)]
#[get("/users/recipes")]
pub async fn list_saved(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let recipes = state.recipes.list_saved(user.user_id()).await?;
    Ok(HttpResponse::Ok().json(recipes))
}

/// Create a custom recipe.
#[utoipa::path(
    post,
    path = "/api/v1/users/recipes",
    request_body = RecipeContent,
    responses(
        (status = 201, description = "Custom recipe created"),
        (status = 400, description = "Invalid recipe content"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["recipes"],
    operation_id = "createCustomRecipe"
)]
#[post("/users/recipes")]
pub async fn create_custom(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RecipeContent>,
) -> ApiResult<HttpResponse> {
    let recipe = state
        .recipes
        .create_custom(user.user_id(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(recipe))
}

/// Replace the content of a custom recipe.
#[utoipa::path(
    put,
    path = "/api/v1/users/recipes/{id}",
    request_body = RecipeContent,
    responses(
        (status = 200, description = "Updated recipe"),
        (status = 400, description = "Invalid content or not a custom recipe"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Recipe not found")
    ),
    tags = ["recipes"],
    operation_id = "updateCustomRecipe"
)]
#[put("/users/recipes/{id}")]
pub async fn update_custom(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<RecipeContent>,
) -> ApiResult<HttpResponse> {
    let recipe = state
        .recipes
        .update_custom(user.user_id(), path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(recipe))
}

/// Delete a saved recipe (favorite or custom).
#[utoipa::path(
    delete,
    path = "/api/v1/users/recipes/{id}",
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Recipe not found")
    ),
    tags = ["recipes"],
    operation_id = "deleteSavedRecipe"
)]
#[delete("/users/recipes/{id}")]
pub async fn delete_saved(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete_saved(user.user_id(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Favorite a catalog recipe.
#[utoipa::path(
    post,
    path = "/api/v1/users/recipes/favorites/{recipe_id}",
    responses(
        (status = 201, description = "Favorite created"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Catalog recipe not found"),
        (status = 409, description = "Already favorited")
    ),
    tags = ["recipes"],
    operation_id = "favoriteRecipe"
)]
#[post("/users/recipes/favorites/{recipe_id}")]
pub async fn favorite(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let recipe = state
        .recipes
        .favorite(user.user_id(), path.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(recipe))
}

/// Remove a favorite.
#[utoipa::path(
    delete,
    path = "/api/v1/users/recipes/favorites/{recipe_id}",
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Favorite not found")
    ),
    tags = ["recipes"],
    operation_id = "unfavoriteRecipe"
)]
#[delete("/users/recipes/favorites/{recipe_id}")]
pub async fn unfavorite(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .unfavorite(user.user_id(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List the user's categories.
#[utoipa::path(
    get,
    path = "/api/v1/users/categories",
    responses(
        (status = 200, description = "Categories"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["recipes"],
    operation_id = "listCategories"
)]
#[get("/users/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let categories = state.recipes.list_categories(user.user_id()).await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/api/v1/users/categories",
    request_body = CategoryBody,
    responses(
        (status = 201, description = "Category created"),
        (status = 400, description = "Invalid name"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["recipes"],
    operation_id = "createCategory"
)]
#[post("/users/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CategoryBody>,
) -> ApiResult<HttpResponse> {
    let name = payload
        .into_inner()
        .name
        .ok_or_else(|| missing_field_error("name"))?;
    let category = state.recipes.create_category(user.user_id(), name).await?;
    Ok(HttpResponse::Created().json(category))
}

/// Delete a category; assignments cascade, recipes stay.
#[utoipa::path(
    delete,
    path = "/api/v1/users/categories/{id}",
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Category not found")
    ),
    tags = ["recipes"],
    operation_id = "deleteCategory"
)]
#[delete("/users/categories/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete_category(user.user_id(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Tag a saved recipe with a category.
#[utoipa::path(
    put,
    path = "/api/v1/users/recipes/{id}/categories/{category_id}",
    responses(
        (status = 204, description = "Category assigned"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Recipe or category not found")
    ),
    tags = ["recipes"],
    operation_id = "assignCategory"
)]
#[put("/users/recipes/{id}/categories/{category_id}")]
pub async fn assign_category(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (recipe_id, category_id) = path.into_inner();
    state
        .recipes
        .assign_category(user.user_id(), recipe_id, category_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove a category tag from a saved recipe.
#[utoipa::path(
    delete,
    path = "/api/v1/users/recipes/{id}/categories/{category_id}",
    responses(
        (status = 204, description = "Assignment removed"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Assignment not found")
    ),
    tags = ["recipes"],
    operation_id = "unassignCategory"
)]
#[delete("/users/recipes/{id}/categories/{category_id}")]
pub async fn unassign_category(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (recipe_id, category_id) = path.into_inner();
    state
        .recipes
        .unassign_category(user.user_id(), recipe_id, category_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        FixtureAccountService, FixturePantryService, FixtureProfileService, MockRecipeService,
    };
    use crate::domain::recipes::Ingredient;
    use crate::domain::{UserId, UserRecipe};
    use crate::inbound::http::state::test_support::{state_with_ports, test_tokens};
    use crate::inbound::http::state::HttpStatePorts;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test as actix_test, App};
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::Arc;

    fn app_with_recipes(
        recipes: MockRecipeService,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = state_with_ports(HttpStatePorts {
            accounts: Arc::new(FixtureAccountService),
            profiles: Arc::new(FixtureProfileService),
            recipes: Arc::new(recipes),
            pantry: Arc::new(FixturePantryService),
        });
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .service(browse_catalog)
                .service(list_saved)
                .service(create_custom)
                .service(favorite)
                .service(unfavorite)
                .service(list_categories)
                .service(create_category)
                .service(delete_category)
                .service(assign_category)
                .service(unassign_category)
                .service(update_custom)
                .service(delete_saved),
        )
    }

    fn bearer(user_id: &UserId) -> (header::HeaderName, String) {
        let issued = test_tokens().issue(user_id).expect("token");
        (header::AUTHORIZATION, format!("Bearer {}", issued.token))
    }

    fn content() -> RecipeContent {
        RecipeContent {
            name: "Lentil soup".into(),
            description: None,
            ingredients: vec![Ingredient {
                name: "lentils".into(),
                quantity: 200.0,
                unit: Some("g".into()),
            }],
            instructions: vec!["Simmer.".into()],
            servings: 4,
            prep_minutes: 10,
            cook_minutes: 30,
            nutrition: None,
        }
    }

    #[actix_web::test]
    async fn create_custom_returns_201() {
        let user_id = UserId::random();
        let mut recipes = MockRecipeService::new();
        recipes
            .expect_create_custom()
            .times(1)
            .return_once(|uid, content| Ok(UserRecipe::custom(*uid, content, Utc::now())));
        let app = actix_test::init_service(app_with_recipes(recipes)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/recipes")
                .insert_header(bearer(&user_id))
                .set_json(&content())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = serde_json::from_slice(&actix_test::read_body(res).await)
            .expect("response JSON");
        assert_eq!(body["isCustom"], true);
        assert_eq!(body["name"], "Lentil soup");
    }

    #[actix_web::test]
    async fn favorite_conflict_surfaces_409_envelope() {
        let user_id = UserId::random();
        let mut recipes = MockRecipeService::new();
        recipes
            .expect_favorite()
            .times(1)
            .return_once(|_, _| Err(crate::domain::Error::conflict("recipe is already favorited")));
        let app = actix_test::init_service(app_with_recipes(recipes)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!(
                    "/api/v1/users/recipes/favorites/{}",
                    Uuid::new_v4()
                ))
                .insert_header(bearer(&user_id))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: Value = serde_json::from_slice(&actix_test::read_body(res).await)
            .expect("error envelope");
        assert_eq!(body["error"]["code"], "ConflictError");
    }

    #[actix_web::test]
    async fn unfavorite_returns_204() {
        let user_id = UserId::random();
        let mut recipes = MockRecipeService::new();
        recipes
            .expect_unfavorite()
            .times(1)
            .return_once(|_, _| Ok(()));
        let app = actix_test::init_service(app_with_recipes(recipes)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!(
                    "/api/v1/users/recipes/favorites/{}",
                    Uuid::new_v4()
                ))
                .insert_header(bearer(&user_id))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn catalog_browse_passes_query_parameters() {
        let user_id = UserId::random();
        let mut recipes = MockRecipeService::new();
        recipes
            .expect_browse_catalog()
            .withf(|query, limit| query.as_deref() == Some("lentil") && *limit == 5)
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));
        let app = actix_test::init_service(app_with_recipes(recipes)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/recipes?query=lentil&limit=5")
                .insert_header(bearer(&user_id))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn category_creation_requires_a_name() {
        let user_id = UserId::random();
        let mut recipes = MockRecipeService::new();
        recipes.expect_create_category().times(0);
        let app = actix_test::init_service(app_with_recipes(recipes)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/categories")
                .insert_header(bearer(&user_id))
                .set_json(serde_json::json!({}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&actix_test::read_body(res).await)
            .expect("error envelope");
        assert_eq!(body["error"]["details"]["field"], "name");
    }
}
