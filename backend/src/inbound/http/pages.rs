//! Static page handlers and the contact form.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{ContactMessage, ContactValidationError, Error};

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Values a static page template needs.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub heading: String,
    pub subheading: String,
    pub image: String,
    pub logged_in: bool,
    pub is_admin: bool,
}

/// Request body for `POST /contact`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    /// Free text; may be empty.
    #[serde(default)]
    pub phone: String,
    pub message: String,
}

/// Confirmation returned once the contact mail is handed to the transport.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactConfirmation {
    pub message: String,
}

fn map_contact_validation_error(err: ContactValidationError) -> Error {
    let field = match err {
        ContactValidationError::EmptyName => "name",
        ContactValidationError::InvalidEmail => "email",
        ContactValidationError::EmptyMessage => "message",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

async fn page(
    state: &HttpState,
    session: &SessionContext,
    heading: &str,
    subheading: &str,
    image: &str,
) -> Result<PageView, Error> {
    let identity = state.identity(session).await?;
    Ok(PageView {
        heading: heading.to_owned(),
        subheading: subheading.to_owned(),
        image: image.to_owned(),
        logged_in: identity.is_authenticated(),
        is_admin: identity.is_admin(),
    })
}

/// About page values.
#[utoipa::path(
    get,
    path = "/about",
    responses((status = 200, description = "About page values", body = PageView)),
    tags = ["pages"],
    operation_id = "aboutPage",
    security([])
)]
#[get("/about")]
pub async fn about(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PageView>> {
    Ok(web::Json(
        page(
            &state,
            &session,
            "About Me",
            "This is what I do.",
            "static/assets/img/about-bg.jpg",
        )
        .await?,
    ))
}

/// Contact page values.
#[utoipa::path(
    get,
    path = "/contact",
    responses((status = 200, description = "Contact page values", body = PageView)),
    tags = ["pages"],
    operation_id = "contactPage",
    security([])
)]
#[get("/contact")]
pub async fn contact_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PageView>> {
    Ok(web::Json(
        page(
            &state,
            &session,
            "Contact Me",
            "Have questions? I have answers.",
            "static/assets/img/contact-bg.jpg",
        )
        .await?,
    ))
}

/// Relay a contact submission to the site owner's mailbox.
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactRequest,
    responses(
        (status = 202, description = "Message handed to the mail transport", body = ContactConfirmation),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Mail transport unavailable", body = Error)
    ),
    tags = ["pages"],
    operation_id = "sendContactMessage",
    security([])
)]
#[post("/contact")]
pub async fn send_contact_message(
    state: web::Data<HttpState>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let message = ContactMessage::try_from_parts(
        &request.name,
        &request.email,
        &request.phone,
        &request.message,
    )
    .map_err(map_contact_validation_error)?;
    message.deliver(state.mailer.as_ref()).await?;
    Ok(HttpResponse::Accepted().json(ContactConfirmation {
        message: "Successfully sent your message".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{test_app, test_app_with_failing_mailer};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::Value;

    #[actix_web::test]
    async fn about_and_contact_pages_carry_their_headers() {
        let app = actix_test::init_service(test_app()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/about").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["heading"], "About Me");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/contact").to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["subheading"], "Have questions? I have answers.");
    }

    #[actix_web::test]
    async fn contact_submission_is_accepted() {
        let app = actix_test::init_service(test_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/contact")
                .set_json(&ContactRequest {
                    name: "Ada".to_owned(),
                    email: "ada@example.com".to_owned(),
                    phone: "555-0100".to_owned(),
                    message: "Hello there".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[actix_web::test]
    async fn invalid_contact_submission_names_the_field() {
        let app = actix_test::init_service(test_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/contact")
                .set_json(&ContactRequest {
                    name: "Ada".to_owned(),
                    email: "not-an-email".to_owned(),
                    phone: String::new(),
                    message: "Hello".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "email");
    }

    #[actix_web::test]
    async fn transport_failure_reads_as_service_unavailable() {
        let app = actix_test::init_service(test_app_with_failing_mailer()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/contact")
                .set_json(&ContactRequest {
                    name: "Ada".to_owned(),
                    email: "ada@example.com".to_owned(),
                    phone: String::new(),
                    message: "Hello".to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
