//! Bearer-token authentication extractor.
//!
//! Handlers take [`AuthenticatedUser`] as an argument; extraction reads the
//! `Authorization` header, verifies the signed token against the state's
//! signer, and yields the user id. Verification is side-effect-free, so the
//! extractor performs no I/O.

use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::domain::tokens::TokenError;
use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

/// The authenticated caller, extracted from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// The authenticated user's id.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

fn bearer_token(request: &HttpRequest) -> Result<&str, Error> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::authentication("missing bearer token"))?;
    let raw = header_value
        .to_str()
        .map_err(|_| Error::authentication("malformed authorization header"))?;
    raw.strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::authentication("authorization header must use the Bearer scheme"))
}

fn authenticate(request: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = request
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(request)?;
    let user_id = state.tokens.verify(token).map_err(|err| match err {
        TokenError::Expired => Error::authentication("session token has expired"),
        _ => Error::authentication("invalid session token"),
    })?;
    Ok(AuthenticatedUser(user_id))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::inbound::http::state::test_support::{fixture_state, test_tokens};
    use actix_web::http::StatusCode;
    use actix_web::{test, App, HttpResponse};

    fn auth_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(fixture_state()))
            .route(
                "/whoami",
                web::get().to(|user: AuthenticatedUser| async move {
                    Ok::<_, Error>(HttpResponse::Ok().body(user.user_id().to_string()))
                }),
            )
    }

    #[actix_web::test]
    async fn valid_token_authenticates() {
        let app = test::init_service(auth_test_app()).await;
        let user_id = UserId::random();
        let issued = test_tokens().issue(&user_id).expect("token issued");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .insert_header((header::AUTHORIZATION, format!("Bearer {}", issued.token)))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorised() {
        let app = test::init_service(auth_test_app()).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn garbage_token_is_unauthorised() {
        let app = test::init_service(auth_test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn non_bearer_scheme_is_unauthorised() {
        let app = test::init_service(auth_test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
