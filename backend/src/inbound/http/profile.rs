//! Profile API handlers.
//!
//! ```text
//! GET /api/v1/users/profile
//! PUT /api/v1/users/profile
//! PUT /api/v1/users/profile/section
//! GET /api/v1/users/profile/history
//! ```

use actix_web::{get, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ProfileView;
use crate::domain::profile::PersonalSection;
use crate::domain::{PreferenceDocument, ProfileChangeRecord, SectionPatch, User};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// The merged profile document returned by the profile endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: User,
    pub sections: PreferenceDocument,
    /// Filled required fields over total required fields.
    pub completion_percent: u8,
    pub onboarding_completed: bool,
}

impl From<ProfileView> for ProfileResponse {
    fn from(value: ProfileView) -> Self {
        Self {
            user: value.user,
            sections: value.document,
            completion_percent: value.completion_percent,
            onboarding_completed: value.onboarding_completed,
        }
    }
}

/// Request body for `PUT /api/v1/users/profile`.
///
/// A focused alias for replacing the personal section.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Defaults to a single-person household when omitted.
    pub household_size: Option<u32>,
}

/// Fetch the authenticated user's merged profile.
///
/// An absent preference document reads as defaults and never fails.
#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    responses(
        (status = 200, description = "Merged profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Unknown user")
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/users/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<ProfileResponse>> {
    let view = state.profiles.get_profile(user.user_id()).await?;
    Ok(web::Json(ProfileResponse::from(view)))
}

/// Replace the personal details of the profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    request_body = PersonalInfoBody,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["profile"],
    operation_id = "updateProfile"
)]
#[put("/users/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<PersonalInfoBody>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let body = payload.into_inner();
    let patch = SectionPatch::Personal(PersonalSection {
        first_name: body.first_name,
        last_name: body.last_name,
        household_size: body.household_size.unwrap_or(1),
    });
    let view = state
        .profiles
        .update_section(user.user_id(), patch)
        .await?;
    Ok(web::Json(ProfileResponse::from(view)))
}

/// Replace one profile section.
///
/// The body is the tagged pair `{"section": ..., "patch": {...}}`; only the
/// named section is touched.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile/section",
    request_body = SectionPatch,
    responses(
        (status = 200, description = "Updated profile with completion", body = ProfileResponse),
        (status = 400, description = "Patch fails the section schema"),
        (status = 401, description = "Unauthorised"),
        (status = 500, description = "Document store failure")
    ),
    tags = ["profile"],
    operation_id = "updateProfileSection"
)]
#[put("/users/profile/section")]
pub async fn update_section(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<SectionPatch>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let view = state
        .profiles
        .update_section(user.user_id(), payload.into_inner())
        .await?;
    Ok(web::Json(ProfileResponse::from(view)))
}

/// Read the profile change ledger, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/profile/history",
    responses(
        (status = 200, description = "Change records", body = [ProfileChangeRecord]),
        (status = 401, description = "Unauthorised")
    ),
    tags = ["profile"],
    operation_id = "getProfileHistory"
)]
#[get("/users/profile/history")]
pub async fn get_history(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let records = state.profiles.history(user.user_id()).await?;
    Ok(HttpResponse::Ok().json(records))
}
