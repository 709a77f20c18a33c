pub use crate::common::RouteResult;

use std::env;

use axum::{routing::on, Router};
use charging::{client::Client, database::Database};
use common::{route_not_found, METHOD_FILTER_ALL};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub listen_addr: String,
}

impl WebConfig {
    /// Reads `LISTEN_ADDR`, falling back to `0.0.0.0:8080`.
    pub fn from_env() -> Self {
        Self {
            listen_addr: env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_owned()),
        }
    }
}

#[derive(Clone)]
pub struct WebState<D: Database> {
    pub client: Client<D>,
}

impl<D: Database> WebState<D> {
    pub fn new(client: Client<D>) -> Self {
        Self { client }
    }
}

pub fn app<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn start_web_server<D: Database>(
    config: &WebConfig,
    state: WebState<D>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.listen_addr).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_comes_from_env() {
        env::remove_var("LISTEN_ADDR");
        assert_eq!(WebConfig::from_env().listen_addr, "0.0.0.0:8080");

        env::set_var("LISTEN_ADDR", "127.0.0.1:9000");
        assert_eq!(WebConfig::from_env().listen_addr, "127.0.0.1:9000");
        env::remove_var("LISTEN_ADDR");
    }
}
