//! lucky-wheel library - HTTP surface of the Lucky Wheel draw service
//!
//! Group CRUD and draws are public; probability override editing sits behind
//! the admin token middleware.

use axum::Router;
use lucky_common::api::AdminAuth;
use lucky_common::draw::{RandomSource, ThreadRandom};
use lucky_common::GroupRepository;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<GroupRepository>,
    pub admin: Arc<AdminAuth>,
    /// Uniform source the draw engine samples from
    pub rng: Arc<dyn RandomSource>,
}

impl AppState {
    /// Create new application state drawing with the thread RNG
    pub fn new(repo: Arc<GroupRepository>, admin: Arc<AdminAuth>) -> Self {
        Self {
            repo,
            admin,
            rng: Arc::new(ThreadRandom),
        }
    }

    /// Replace the random source (seeded draws in tests)
    pub fn with_rng(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }
}

/// Build application router
///
/// With `static_dir`, any path no route matches is served from that folder,
/// falling back to its `index.html` so the front end can own client-side routes.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Admin routes (require X-Admin-Token)
    let admin = Router::new()
        .route(
            "/api/admin/probability/:group_id",
            get(api::get_probability).put(api::put_probability),
        )
        .route("/api/admin/groups", get(api::admin_list_groups))
        .route("/api/admin/logout", post(api::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::admin_auth_middleware,
        ));

    // Public routes
    let public = Router::new()
        .route("/api/groups", get(api::list_groups).post(api::create_group))
        .route(
            "/api/groups/:id",
            get(api::get_group)
                .put(api::update_group)
                .delete(api::delete_group),
        )
        .route("/api/draw/:group_id", post(api::draw))
        .route("/api/admin/login", post(api::login))
        .route("/build_info", get(api::get_build_info))
        .merge(api::health_routes());

    let mut router = Router::new().merge(admin).merge(public);

    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
