use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// Note: authentication is handled outside this service
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/api/categories/flat", get(handlers::list_flat))
        .route("/api/categories/visible", get(handlers::list_visible))
        .route(
            "/api/categories/parent-options",
            get(handlers::get_parent_options),
        )
        .route(
            "/api/categories/refresh",
            post(handlers::refresh_categories),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/categories/{id}/descendants",
            get(handlers::get_descendants),
        )
        .with_state(service)
}
