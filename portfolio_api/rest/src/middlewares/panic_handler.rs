use std::panic::AssertUnwindSafe;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{from_fn, Next},
    response::Response,
    Router,
};
use futures::FutureExt;
use tracing::error;

use crate::routes::failure;

pub fn add<S: Clone + Send + Sync + 'static>(
    allowed_origin: HeaderValue,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(move |request: Request, next: Next| {
            let allowed_origin = allowed_origin.clone();
            async move {
                match AssertUnwindSafe(next.run(request)).catch_unwind().await {
                    Ok(response) => response,
                    Err(_) => {
                        error!("request handler panicked");
                        failure(&allowed_origin)
                    }
                }
            }
        }))
    }
}
