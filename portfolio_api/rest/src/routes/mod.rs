use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::models::contact::ApiContactResponse;

pub mod contact;

fn cors_headers(allowed_origin: &HeaderValue) -> [(header::HeaderName, HeaderValue); 2] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, allowed_origin.clone()),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ),
    ]
}

fn envelope(
    status: StatusCode,
    body: ApiContactResponse,
    allowed_origin: &HeaderValue,
) -> Response {
    (status, cors_headers(allowed_origin), Json(body)).into_response()
}

pub fn failure(allowed_origin: &HeaderValue) -> Response {
    envelope(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiContactResponse::failure(),
        allowed_origin,
    )
}
