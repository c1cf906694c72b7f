use std::future::Future;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route("/shorten", post(shorten_handler))
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Serves requests until `signal` resolves, then shuts the shortener down.
    ///
    /// The shortener is shut down whether the server stopped cleanly or failed.
    pub async fn serve<F>(listener: TcpListener, state: AppState, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let served = axum::serve(listener, Self::router(state.clone()))
            .with_graceful_shutdown(signal)
            .await;

        state.shortener().shutdown().await;
        served
    }
}
