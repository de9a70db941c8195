use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, health_handler,
    list_links_handler, redirect_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Routes without middleware. Static paths win over `/{code}`, and the
    /// redirect handler additionally refuses the reserved segments.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route(
                "/api/links",
                post(create_link_handler).get(list_links_handler),
            )
            .route(
                "/api/links/{code}",
                get(get_link_handler).delete(delete_link_handler),
            )
            .route("/{code}", get(redirect_handler))
            .with_state(state)
    }

    /// Only the configured frontend may call the API from a browser.
    pub fn cors(frontend_origin: HeaderValue) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(frontend_origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    }

    /// The router wrapped in CORS and request tracing, ready to serve.
    pub fn service(state: AppState, frontend_origin: HeaderValue) -> Router {
        Self::router(state)
            .layer(Self::cors(frontend_origin))
            .layer(TraceLayer::new_for_http())
    }
}
