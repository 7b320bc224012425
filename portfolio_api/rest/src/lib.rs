use std::net::IpAddr;

use axum::{http::HeaderValue, Router};
use portfolio_core_contact_contracts::ContactFeatureService;
use portfolio_di::Build;
use tokio::net::TcpListener;
use tracing::info;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone, Build)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Value of the `Access-Control-Allow-Origin` header on every envelope.
    pub allowed_origin: HeaderValue,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactFeatureService,
{
    pub async fn serve(self) -> anyhow::Result<()> {
        let RestServerConfig { host, port, .. } = self.config;
        let listener = TcpListener::bind((host, port)).await?;
        info!("Listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router())
            .await
            .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let allowed_origin = self.config.allowed_origin;

        let router = routes::contact::router(self.contact, allowed_origin.clone());
        let router = middlewares::panic_handler::add(allowed_origin)(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}
