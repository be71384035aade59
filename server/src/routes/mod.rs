//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves three things: the backend API paths the client
//! calls (relayed by `proxy::forward`), the Leptos SSR app for every page
//! route, and the compiled WASM/CSS bundle under `/pkg`.

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::proxy;
use crate::state::AppState;

/// Backend endpoints relayed verbatim.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/login/onsubmit", post(proxy::forward))
        .route("/auth/register/onsubmit", post(proxy::forward))
        .route("/auth/logout/onsubmit", post(proxy::forward))
        .route("/auth/reset-request/onsubmit", post(proxy::forward))
        .route("/auth/reset-confirm/onsubmit", post(proxy::forward))
        .route("/auth/me", get(proxy::forward))
        .route("/{page}/onload", get(proxy::forward))
        .route("/livez", get(proxy::forward))
        .route("/readyz", get(proxy::forward))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// API proxy + Leptos SSR + static assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[workspace.metadata.leptos]` section).
pub fn app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);
    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .fallback(leptos_axum::file_and_error_handler(client::app::shell))
        .with_state(leptos_options);

    Ok(api_routes(state)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .merge(leptos_router)
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
