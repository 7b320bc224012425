//! Fake OAuth2 authority implementing the refresh token grant.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Form, Json, Router,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use rand::{
    distributions::{Alphanumeric, DistString},
    thread_rng,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Clone)]
pub struct FakeAuthorityConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Lifetime of issued access tokens in seconds
    pub expires_in: u64,
    /// Answer every token request with a plain text 503 like an authority
    /// behind a failing proxy.
    pub unavailable: bool,
}

impl Default for FakeAuthorityConfig {
    fn default() -> Self {
        Self {
            client_id: "client-id".into(),
            client_secret: "client-secret".into(),
            refresh_token: "refresh-token".into(),
            expires_in: 3599,
            unavailable: false,
        }
    }
}

pub async fn start_server(
    host: IpAddr,
    port: u16,
    config: FakeAuthorityConfig,
) -> anyhow::Result<()> {
    info!("Starting oauth2 testing server on {host}:{port}");
    info!("Token endpoint: http://{host}:{port}/oauth2/token");
    info!("Client ID: {:?}", config.client_id);
    info!("Client secret: {:?}", config.client_secret);
    info!("Refresh token: {:?}", config.refresh_token);

    let listener = TcpListener::bind((host, port)).await?;
    axum::serve(listener, router(config)).await?;

    Ok(())
}

/// Serve the fake authority on a random local port in the background and
/// return its address.
pub async fn spawn(config: FakeAuthorityConfig) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    let router = router(config);
    tokio::spawn(async move { axum::serve(listener, router).await });
    Ok(addr)
}

pub fn router(config: FakeAuthorityConfig) -> Router<()> {
    Router::new()
        .route("/oauth2/token", routing::post(token))
        .with_state(Arc::new(config))
}

type State = axum::extract::State<Arc<FakeAuthorityConfig>>;

#[derive(Debug, Deserialize)]
struct TokenForm {
    grant_type: String,
    refresh_token: Option<String>,
}

#[derive(Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
    expires_in: u64,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

async fn token(
    state: State,
    auth: Option<TypedHeader<Authorization<Basic>>>,
    Form(form): Form<TokenForm>,
) -> Response {
    if state.unavailable {
        return (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response();
    }

    let Some(TypedHeader(auth)) = auth else {
        return error(StatusCode::UNAUTHORIZED, "invalid_client");
    };
    if auth.username() != state.client_id || auth.password() != state.client_secret {
        return error(StatusCode::UNAUTHORIZED, "invalid_client");
    }

    if form.grant_type != "refresh_token" {
        return error(StatusCode::BAD_REQUEST, "unsupported_grant_type");
    }
    if form.refresh_token.as_deref() != Some(state.refresh_token.as_str()) {
        return error(StatusCode::BAD_REQUEST, "invalid_grant");
    }

    Json(TokenResponse {
        access_token: generate_token(),
        token_type: "bearer",
        expires_in: state.expires_in,
    })
    .into_response()
}

fn error(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn generate_token() -> String {
    Alphanumeric.sample_string(&mut thread_rng(), 32)
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    // "client-id:client-secret"
    const BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

    async fn request(
        authorization: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, serde_json::Value) {
        let (status, body) = request_raw(FakeAuthorityConfig::default(), authorization, body).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn request_raw(
        config: FakeAuthorityConfig,
        authorization: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Vec<u8>) {
        let mut request = Request::post("/oauth2/token")
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(authorization) = authorization {
            request = request.header("authorization", authorization);
        }

        let response = router(config)
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn refresh_token_grant() {
        let (status, body) = request(
            Some(BASIC_AUTH),
            "grant_type=refresh_token&refresh_token=refresh-token",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["expires_in"], 3599);
        assert_eq!(body["access_token"].as_str().unwrap().len(), 32);
    }

    #[tokio::test]
    async fn invalid_refresh_token() {
        let (status, body) = request(
            Some(BASIC_AUTH),
            "grant_type=refresh_token&refresh_token=revoked",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_grant");
    }

    #[tokio::test]
    async fn missing_client_authentication() {
        let (status, body) =
            request(None, "grant_type=refresh_token&refresh_token=refresh-token").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_client");
    }

    #[tokio::test]
    async fn unsupported_grant_type() {
        let (status, body) = request(Some(BASIC_AUTH), "grant_type=authorization_code").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unsupported_grant_type");
    }

    #[tokio::test]
    async fn unavailable_authority() {
        let config = FakeAuthorityConfig {
            unavailable: true,
            ..Default::default()
        };

        let (status, body) = request_raw(
            config,
            Some(BASIC_AUTH),
            "grant_type=refresh_token&refresh_token=refresh-token",
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, b"Service Unavailable");
    }
}
