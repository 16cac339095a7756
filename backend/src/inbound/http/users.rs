//! Account API handlers: registration, login, and logout.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    CredentialValidationError, Error, LoginCredentials, Registration, User, UserValidationError,
};

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Request body for `POST /register`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated account as seen by the caller.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub admin: bool,
}

impl From<User> for AccountView {
    fn from(user: User) -> Self {
        Self {
            id: user.id().value(),
            name: user.name().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            admin: user.is_admin(),
        }
    }
}

fn map_credential_validation_error(err: CredentialValidationError) -> Error {
    let field = match &err {
        CredentialValidationError::User(
            UserValidationError::EmptyDisplayName | UserValidationError::DisplayNameTooLong { .. },
        ) => "name",
        CredentialValidationError::User(
            UserValidationError::EmptyEmail | UserValidationError::InvalidEmail,
        ) => "email",
        CredentialValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Create an account and sign the caller in.
///
/// The first account ever registered is granted the administrator role.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = AccountView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let registration =
        Registration::try_from_parts(&request.name, &request.email, &request.password)
            .map_err(map_credential_validation_error)?;
    let user = state.accounts.register(registration).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Created().json(AccountView::from(user)))
}

/// Exchange credentials for a session cookie.
///
/// Wrong password and unknown email both produce the same 401 body.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AccountView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid email or password", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&request.email, &request.password)
        .map_err(map_credential_validation_error)?;
    let user = state.accounts.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(AccountView::from(user)))
}

/// Drop the caller's session.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::Value;

    async fn register_via_api(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        name: &str,
        email: &str,
        password: &str,
    ) -> actix_web::dev::ServiceResponse {
        actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/register")
                .set_json(&RegisterRequest {
                    name: name.to_owned(),
                    email: email.to_owned(),
                    password: password.to_owned(),
                })
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn register_signs_in_and_grants_admin_to_the_first_account() {
        let app = actix_test::init_service(test_app()).await;

        let res = register_via_api(&app, "Ada", "ada@example.com", "pw").await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(session_cookie(&res).is_some());
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["admin"], true);

        let res = register_via_api(&app, "Bob", "bob@example.com", "pw").await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["admin"], false);
    }

    #[actix_web::test]
    async fn duplicate_registration_conflicts() {
        let app = actix_test::init_service(test_app()).await;
        register_via_api(&app, "Ada", "ada@example.com", "pw").await;

        let res = register_via_api(&app, "Imposter", "Ada@Example.com", "pw").await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "email");
    }

    #[actix_web::test]
    async fn wrong_password_and_unknown_email_share_one_message() {
        let app = actix_test::init_service(test_app()).await;
        register_via_api(&app, "Ada", "ada@example.com", "hunter2").await;

        let mut messages = Vec::new();
        for (email, password) in [
            ("ada@example.com", "wrong"),
            ("nobody@example.com", "hunter2"),
        ] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/login")
                    .set_json(&LoginRequest {
                        email: email.to_owned(),
                        password: password.to_owned(),
                    })
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            let body: Value = actix_test::read_body_json(res).await;
            messages.push(body["message"].clone());
        }
        assert_eq!(messages[0], messages[1]);
    }

    #[actix_web::test]
    async fn login_then_logout_drops_the_session() {
        let app = actix_test::init_service(test_app()).await;
        register_via_api(&app, "Ada", "ada@example.com", "pw").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_json(&LoginRequest {
                    email: "ada@example.com".to_owned(),
                    password: "pw".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = session_cookie(&res).expect("session cookie");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn malformed_registration_names_the_field() {
        let app = actix_test::init_service(test_app()).await;
        let res = register_via_api(&app, "Ada", "not-an-email", "pw").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "email");
    }
}
