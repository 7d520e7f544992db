use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{
    CategoryEditInput, DeleteCategoryResponseDto, DescendantsResponseDto, ListCategoriesQuery,
    NewCategoryInput, ParentOptionsQuery, RefreshResponseDto, VisibleRowsQuery,
};
use crate::features::categories::models::{
    CategoryId, CategoryRecord, FlatNode, ParentOptions, VisibleRows,
};
use crate::features::categories::services::CategoryService;
use crate::features::categories::tree::ExpansionState;
use crate::shared::types::{ApiResponse, Meta};

/// List all categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryRecord>>),
        (status = 502, description = "Category store unavailable")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let (value, total) = if query.tree {
        let build = service.tree().await?;
        let total = build.node_count();
        (to_value(build)?, total)
    } else {
        let categories = service.list().await?;
        let total = categories.len();
        (to_value(categories)?, total)
    };
    Ok(Json(ApiResponse::success(
        Some(value),
        None,
        Some(Meta {
            total: total as i64,
        }),
    )))
}

/// Depth-annotated pre-order list of every category
#[utoipa::path(
    get,
    path = "/api/categories/flat",
    responses(
        (status = 200, description = "Flattened category tree", body = ApiResponse<Vec<FlatNode>>),
    ),
    tag = "categories"
)]
pub async fn list_flat(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<FlatNode>>>> {
    let flat = service.flat().await?;
    Ok(Json(ApiResponse::success(Some(flat), None, None)))
}

/// Rows shown by the tree view
///
/// The client sends its expanded ids plus the expand/collapse actions to apply
/// and gets back the rows and the new expanded ids.
#[utoipa::path(
    get,
    path = "/api/categories/visible",
    params(VisibleRowsQuery),
    responses(
        (status = 200, description = "Visible tree rows", body = ApiResponse<VisibleRows>),
        (status = 404, description = "Targeted category not found")
    ),
    tag = "categories"
)]
pub async fn list_visible(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<VisibleRowsQuery>,
) -> Result<Json<ApiResponse<VisibleRows>>> {
    let state = ExpansionState::from_ids(query.expanded_ids());
    let view = service.visible_rows(state, &query.actions()).await?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}

/// Legal parents for a create (no `editing`) or edit form
#[utoipa::path(
    get,
    path = "/api/categories/parent-options",
    params(ParentOptionsQuery),
    responses(
        (status = 200, description = "Parent options", body = ApiResponse<ParentOptions>),
        (status = 404, description = "Edited category not found")
    ),
    tag = "categories"
)]
pub async fn get_parent_options(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ParentOptionsQuery>,
) -> Result<Json<ApiResponse<ParentOptions>>> {
    let options = service.parent_options(query.editing.as_ref()).await?;
    Ok(Json(ApiResponse::success(Some(options), None, None)))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = String, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryRecord>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CategoryRecord>>> {
    let category = service.get(&CategoryId::new(id)).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Ids of every descendant of a category
#[utoipa::path(
    get,
    path = "/api/categories/{id}/descendants",
    params(
        ("id" = String, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Descendant ids", body = ApiResponse<DescendantsResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_descendants(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DescendantsResponseDto>>> {
    let id = CategoryId::new(id);
    let descendant_ids = service.descendants(&id).await?;
    Ok(Json(ApiResponse::success(
        Some(DescendantsResponseDto { id, descendant_ids }),
        None,
        None,
    )))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = NewCategoryInput,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryRecord>),
        (status = 400, description = "Validation error"),
        (status = 422, description = "Parent category not found")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<NewCategoryInput>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryRecord>>)> {
    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Edit or reparent a category
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = String, Path, description = "Category id")
    ),
    request_body = CategoryEditInput,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryRecord>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Reparent would create a cycle, or snapshot was stale"),
        (status = 422, description = "Parent category not found")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<CategoryEditInput>,
) -> Result<Json<ApiResponse<CategoryRecord>>> {
    let category = service.update(&CategoryId::new(id), dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete a category; children are handled by the configured delete policy
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = String, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<DeleteCategoryResponseDto>),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has children (restrict policy)")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteCategoryResponseDto>>> {
    let outcome = service.delete(&CategoryId::new(id)).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Drop the cached snapshot and refetch from the store
#[utoipa::path(
    post,
    path = "/api/categories/refresh",
    responses(
        (status = 200, description = "Snapshot refreshed", body = ApiResponse<RefreshResponseDto>),
        (status = 502, description = "Category store unavailable")
    ),
    tag = "categories"
)]
pub async fn refresh_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<RefreshResponseDto>>> {
    let total = service.refresh().await?;
    Ok(Json(ApiResponse::success(
        Some(RefreshResponseDto { total }),
        None,
        None,
    )))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to serialize categories: {}", e)))
}
