use axum::http::HeaderValue;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{auth::AuthenticatedUser, state::AppState};

pub mod auth;
pub mod health;
pub mod hierarchy;
pub mod offboardings;
pub mod onboardings;
pub mod records;
pub mod terminations;
pub mod users;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = if let Some(origins) = state.config.cors_allowed_origin.as_ref() {
        let headers: Vec<HeaderValue> = origins
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .filter_map(|value| match value.parse::<HeaderValue>() {
                Ok(header) => Some(header),
                Err(_) => {
                    tracing::warn!(origin = value, "ignoring invalid CORS allowed origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(headers))
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    };

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    let offboarding_routes = Router::new()
        .route(
            "/",
            get(offboardings::list_offboardings).post(offboardings::create_offboarding),
        )
        .route(
            "/:id",
            get(offboardings::get_offboarding)
                .put(offboardings::update_offboarding)
                .delete(offboardings::delete_offboarding),
        )
        .route("/:id/status", patch(offboardings::update_offboarding_status))
        .route("/:id/export", get(offboardings::export_offboarding));

    let onboarding_routes = Router::new()
        .route(
            "/",
            get(onboardings::list_onboardings).post(onboardings::create_onboarding),
        )
        .route(
            "/:id",
            get(onboardings::get_onboarding)
                .put(onboardings::update_onboarding)
                .delete(onboardings::delete_onboarding),
        )
        .route("/:id/status", patch(onboardings::update_onboarding_status))
        .route("/:id/export", get(onboardings::export_onboarding));

    let termination_routes = Router::new()
        .route(
            "/",
            get(terminations::list_terminations).post(terminations::create_termination),
        )
        .route(
            "/:id",
            get(terminations::get_termination)
                .put(terminations::update_termination)
                .delete(terminations::delete_termination),
        )
        .route("/:id/status", patch(terminations::update_termination_status))
        .route("/:id/export", get(terminations::export_termination));

    let hierarchy_routes = Router::new()
        .route("/", get(hierarchy::list_edges).post(hierarchy::create_edge))
        .route("/:id", delete(hierarchy::delete_edge));

    let protected_state = state.clone();
    let protected_routes = Router::new()
        .nest("/api/offboardings", offboarding_routes)
        .nest("/api/onboardings", onboarding_routes)
        .nest("/api/terminations", termination_routes)
        .nest("/api/hierarchy", hierarchy_routes)
        .route("/api/users", get(users::list_users))
        .layer(middleware::from_extractor_with_state::<AuthenticatedUser, _>(protected_state));

    Router::new()
        .merge(protected_routes)
        .nest("/api/auth", auth_routes)
        .route("/api/health", get(health::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
}
