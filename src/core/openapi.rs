use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::categories::models as categories_models;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (reads)
        categories_handlers::list_categories,
        categories_handlers::list_flat,
        categories_handlers::list_visible,
        categories_handlers::get_parent_options,
        categories_handlers::get_category,
        categories_handlers::get_descendants,
        // Categories (mutations)
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        categories_handlers::refresh_categories,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_models::CategoryId,
            categories_models::CategoryStatus,
            categories_models::CategoryRecord,
            categories_models::CategoryNode,
            categories_models::FlatNode,
            categories_models::TreeAnomaly,
            categories_models::TreeBuild,
            categories_models::ParentOptions,
            categories_models::VisibleRows,
            categories_models::DeletePolicy,
            categories_dtos::NewCategoryInput,
            categories_dtos::CategoryEditInput,
            categories_dtos::DescendantsResponseDto,
            categories_dtos::DeleteCategoryResponseDto,
            categories_dtos::RefreshResponseDto,
            ApiResponse<Vec<categories_models::CategoryRecord>>,
            ApiResponse<categories_models::CategoryRecord>,
            ApiResponse<categories_models::TreeBuild>,
            ApiResponse<Vec<categories_models::FlatNode>>,
            ApiResponse<categories_models::ParentOptions>,
            ApiResponse<categories_models::VisibleRows>,
            ApiResponse<categories_dtos::DescendantsResponseDto>,
            ApiResponse<categories_dtos::DeleteCategoryResponseDto>,
            ApiResponse<categories_dtos::RefreshResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Hierarchical portfolio categories"),
    ),
    info(
        title = "Portfolio Core API",
        version = "0.1.0",
        description = "API documentation for Portfolio Core",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_category_routes() {
        let openapi = ApiDoc::openapi();

        for path in [
            "/api/categories",
            "/api/categories/flat",
            "/api/categories/visible",
            "/api/categories/parent-options",
            "/api/categories/refresh",
            "/api/categories/{id}",
            "/api/categories/{id}/descendants",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut openapi = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Docs".to_string(),
            version: "9.9.9".to_string(),
            description: "Custom".to_string(),
        }
        .modify(&mut openapi);

        assert_eq!(openapi.info.title, "Docs");
        assert_eq!(openapi.info.description.as_deref(), Some("Custom"));
    }
}
