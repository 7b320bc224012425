use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing, Router,
};
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_models::contact::{ContactMessage, Submission, ValidationResult};
use thiserror::Error;
use tracing::error;

use super::{cors_headers, envelope, failure};
use crate::models::contact::{ApiContactMessage, ApiContactResponse};

struct ContactRoute<Service> {
    service: Service,
    allowed_origin: HeaderValue,
}

pub fn router(service: impl ContactFeatureService, allowed_origin: HeaderValue) -> Router<()> {
    Router::new()
        .route(
            "/contact",
            routing::post(send_message)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(Arc::new(ContactRoute {
            service,
            allowed_origin,
        }))
}

type ContactState<S> = State<Arc<ContactRoute<S>>>;

async fn send_message(
    state: ContactState<impl ContactFeatureService>,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing request body").into_response();
    }

    match dispatch(&state.service, &body).await {
        Ok(()) => envelope(
            StatusCode::OK,
            ApiContactResponse::success(),
            &state.allowed_origin,
        ),
        Err(err) => {
            error!("Failed to dispatch contact message: {err}");
            failure(&state.allowed_origin)
        }
    }
}

async fn preflight(state: ContactState<impl ContactFeatureService>) -> Response {
    (
        StatusCode::NO_CONTENT,
        cors_headers(&state.allowed_origin),
        [(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        )],
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}

#[derive(Debug, Error)]
enum DispatchError {
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("Invalid submission: {0}")]
    InvalidSubmission(ValidationResult),
    #[error(transparent)]
    Send(#[from] ContactSendMessageError),
}

async fn dispatch(
    service: &impl ContactFeatureService,
    body: &[u8],
) -> Result<(), DispatchError> {
    let message = serde_json::from_slice::<ApiContactMessage>(body)?;
    let message = ContactMessage::try_from(Submission::from(message))
        .map_err(DispatchError::InvalidSubmission)?;
    service.send_message(message).await?;
    Ok(())
}
