//! Category store clients.
//!
//! The category store is an external system exposing plain CRUD. It is
//! treated as untrusted and non-transactional: it may return corrupted
//! hierarchies and it never enforces tree invariants on its own.

mod http_store;
mod memory_store;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::error::AppError;
use crate::features::categories::dtos::{CategoryEditInput, NewCategoryInput};
use crate::features::categories::models::{CategoryId, CategoryRecord};

pub use http_store::HttpCategoryStore;
pub use memory_store::InMemoryCategoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("category '{0}' not found in store")]
    NotFound(CategoryId),

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode store response: {0}")]
    Decode(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            // The snapshot believed the id existed, so someone else changed the store
            StoreError::NotFound(id) => AppError::StaleSnapshot(format!(
                "Category '{}' no longer exists in the store",
                id
            )),
            other => AppError::ExternalServiceError(other.to_string()),
        }
    }
}

/// Fetch and persist contract of the remote category store
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Full flat list; the tree logic needs every record to be correct
    async fn list_categories(&self) -> StoreResult<Vec<CategoryRecord>>;

    async fn create_category(&self, input: &NewCategoryInput) -> StoreResult<CategoryRecord>;

    async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryEditInput,
    ) -> StoreResult<CategoryRecord>;

    async fn delete_category(&self, id: &CategoryId) -> StoreResult<()>;

    /// Delete every id in one request. The store removes all of them or none;
    /// an unknown id fails the whole batch.
    async fn delete_categories(&self, ids: &[CategoryId]) -> StoreResult<()>;
}
