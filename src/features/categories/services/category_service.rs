use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::clients::CategoryStore;
use crate::features::categories::dtos::{
    CategoryEditInput, DeleteCategoryResponseDto, NewCategoryInput,
};
use crate::features::categories::models::{
    CategoryId, CategoryRecord, DeletePolicy, FlatNode, ParentOptions, TreeBuild, VisibleRows,
};
use crate::features::categories::tree::{
    self, build_tree, collect_descendant_ids, descendants_leaves_first,
    is_legal_parent, ExpansionAction, ExpansionState,
};

// Last list fetched from the store
struct Snapshot {
    records: Arc<Vec<CategoryRecord>>,
    fetched_at: Instant,
}

/// Coordinates category reads and validated mutations against the store.
///
/// Holds the most recently fetched flat list. Every mutation that reaches the
/// store drops it, so the next read works on a fresh list.
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
    snapshot: RwLock<Option<Snapshot>>,
    delete_policy: DeletePolicy,
}

impl std::fmt::Debug for CategoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryService")
            .field("store", &"<CategoryStore>")
            .field("delete_policy", &self.delete_policy)
            .finish()
    }
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>, delete_policy: DeletePolicy) -> Self {
        Self {
            store,
            snapshot: RwLock::new(None),
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    // =========================================================================
    // SNAPSHOT
    // =========================================================================

    async fn records(&self) -> Result<Arc<Vec<CategoryRecord>>> {
        {
            let cached = self.snapshot.read().await;
            if let Some(ref snapshot) = *cached {
                tracing::trace!(
                    "Using category snapshot fetched {:?} ago",
                    snapshot.fetched_at.elapsed()
                );
                return Ok(Arc::clone(&snapshot.records));
            }
        }
        self.fetch().await
    }

    async fn fetch(&self) -> Result<Arc<Vec<CategoryRecord>>> {
        let records = self.store.list_categories().await.map_err(|e| {
            tracing::error!("Failed to list categories: {}", e);
            AppError::from(e)
        })?;
        let records = Arc::new(records);

        let mut cached = self.snapshot.write().await;
        *cached = Some(Snapshot {
            records: Arc::clone(&records),
            fetched_at: Instant::now(),
        });
        tracing::debug!("Fetched {} categories from store", records.len());

        Ok(records)
    }

    async fn invalidate(&self) {
        self.snapshot.write().await.take();
    }

    /// Snapshot containing every id in `ids`, refetching once if any is missing.
    /// Missing ids after the refetch are left to the caller to report.
    async fn records_with(&self, ids: &[&CategoryId]) -> Result<Arc<Vec<CategoryRecord>>> {
        let records = self.records().await?;
        if ids.iter().all(|id| contains(&records, id)) {
            return Ok(records);
        }
        tracing::debug!("Category snapshot is missing referenced ids, refetching");
        self.fetch().await
    }

    /// Drop the cached list and fetch a new one
    pub async fn refresh(&self) -> Result<usize> {
        self.invalidate().await;
        let records = self.fetch().await?;
        tracing::info!("Category snapshot refreshed: {} categories", records.len());
        Ok(records.len())
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub async fn list(&self) -> Result<Vec<CategoryRecord>> {
        Ok(self.records().await?.as_ref().clone())
    }

    pub async fn get(&self, id: &CategoryId) -> Result<CategoryRecord> {
        let records = self.records_with(&[id]).await?;
        find(&records, id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub async fn tree(&self) -> Result<TreeBuild> {
        let records = self.records().await?;
        let build = build_tree(&records);
        if build.has_cycles() {
            tracing::error!(
                "Category store holds a parent cycle; affected records were placed at root"
            );
        }
        if !build.anomalies.is_empty() {
            tracing::warn!(
                "Category tree built with {} anomalies: {:?}",
                build.anomalies.len(),
                build.anomalies
            );
        }
        Ok(build)
    }

    pub async fn flat(&self) -> Result<Vec<FlatNode>> {
        let build = self.tree().await?;
        Ok(tree::flatten(&build.roots))
    }

    /// Rows of a tree view after applying `actions` to the client's expansion state
    pub async fn visible_rows(
        &self,
        mut state: ExpansionState,
        actions: &[ExpansionAction],
    ) -> Result<VisibleRows> {
        let records = self.records().await?;
        if let Some(id) = actions
            .iter()
            .filter_map(ExpansionAction::target)
            .find(|id| !contains(&records, id))
        {
            return Err(not_found(id));
        }

        let build = build_tree(&records);
        for action in actions {
            state.apply(action, &records, &build.roots);
        }
        state.retain_existing(&build.roots);

        Ok(VisibleRows {
            rows: state.visible_rows(&build.roots),
            expanded: state.ids(),
        })
    }

    /// Descendant ids of a category, sorted
    pub async fn descendants(&self, id: &CategoryId) -> Result<Vec<CategoryId>> {
        let records = self.records_with(&[id]).await?;
        if !contains(&records, id) {
            return Err(not_found(id));
        }
        let mut ids: Vec<_> = collect_descendant_ids(id, &records).into_iter().collect();
        ids.sort();
        Ok(ids)
    }

    pub async fn parent_options(&self, editing: Option<&CategoryId>) -> Result<ParentOptions> {
        let records = self.editing_snapshot(editing).await?;
        Ok(tree::parent_options(&records, editing))
    }

    async fn editing_snapshot(
        &self,
        editing: Option<&CategoryId>,
    ) -> Result<Arc<Vec<CategoryRecord>>> {
        match editing {
            None => self.records().await,
            Some(id) => {
                let records = self.records_with(&[id]).await?;
                if !contains(&records, id) {
                    return Err(not_found(id));
                }
                Ok(records)
            }
        }
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    pub async fn create(&self, input: NewCategoryInput) -> Result<CategoryRecord> {
        let input = input.normalized();
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let records = match input.parent_id.as_ref() {
            Some(parent) => {
                let records = self.records_with(&[parent]).await?;
                if !is_legal_parent(&records, None, parent) {
                    return Err(parent_not_found(parent));
                }
                records
            }
            None => self.records().await?,
        };

        let result = self.store.create_category(&input).await;
        self.invalidate().await;
        let created = result.map_err(|e| {
            tracing::error!("Failed to create category: {}", e);
            AppError::from(e)
        })?;

        if contains(&records, &created.id) {
            return Err(AppError::StaleSnapshot(format!(
                "Store assigned id '{}' which already exists in the snapshot",
                created.id
            )));
        }

        tracing::info!(
            "Created category {} under {}",
            created.id,
            created
                .parent_id
                .as_ref()
                .map_or("root", CategoryId::as_str)
        );
        Ok(created)
    }

    pub async fn update(&self, id: &CategoryId, input: CategoryEditInput) -> Result<CategoryRecord> {
        let input = input.normalized();
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if input.parent_id.as_ref() == Some(id) {
            return Err(AppError::Cycle(format!(
                "Category '{}' cannot be its own parent",
                id
            )));
        }

        let mut wanted = vec![id];
        if let Some(parent) = input.parent_id.as_ref() {
            wanted.push(parent);
        }
        let records = self.records_with(&wanted).await?;
        let existing = find(&records, id).ok_or_else(|| not_found(id))?;

        if existing.parent_id != input.parent_id {
            if let Some(parent) = input.parent_id.as_ref() {
                if !contains(&records, parent) {
                    return Err(parent_not_found(parent));
                }
                if !is_legal_parent(&records, Some(id), parent) {
                    return Err(AppError::Cycle(format!(
                        "Category '{}' is a descendant of '{}' and cannot become its parent",
                        parent, id
                    )));
                }
            }
        }

        let result = self.store.update_category(id, &input).await;
        self.invalidate().await;
        let updated = result.map_err(|e| {
            tracing::error!("Failed to update category {}: {}", id, e);
            AppError::from(e)
        })?;

        if &updated.id != id {
            return Err(AppError::StaleSnapshot(format!(
                "Store answered update of '{}' with category '{}'",
                id, updated.id
            )));
        }

        tracing::info!("Updated category {}", id);
        Ok(updated)
    }

    /// Delete a category, handling its children per the configured policy
    pub async fn delete(&self, id: &CategoryId) -> Result<DeleteCategoryResponseDto> {
        // Structural deletes always work on a fresh list
        self.invalidate().await;
        let records = self.fetch().await?;
        let target = find(&records, id).cloned().ok_or_else(|| not_found(id))?;
        let children: Vec<&CategoryRecord> =
            records.iter().filter(|r| r.is_child_of(id)).collect();

        let outcome = match self.delete_policy {
            DeletePolicy::Restrict => self.delete_restrict(id, children.len()).await,
            DeletePolicy::Cascade => self.delete_cascade(id, &records).await,
            DeletePolicy::Reparent => {
                self.delete_reparent(&target, &children, &records).await
            }
        };
        self.invalidate().await;

        let outcome = outcome?;
        tracing::info!(
            "Deleted category {} ({} policy): {} removed, {} reparented",
            id,
            self.delete_policy,
            outcome.deleted.len(),
            outcome.reparented.len()
        );
        Ok(outcome)
    }

    async fn delete_restrict(
        &self,
        id: &CategoryId,
        child_count: usize,
    ) -> Result<DeleteCategoryResponseDto> {
        if child_count > 0 {
            return Err(AppError::DependentsExist(format!(
                "Category '{}' has {} child categories",
                id, child_count
            )));
        }
        self.store.delete_category(id).await?;

        Ok(DeleteCategoryResponseDto {
            policy: DeletePolicy::Restrict,
            deleted: vec![id.clone()],
            reparented: Vec::new(),
        })
    }

    /// One batch call; the store removes the whole subtree or nothing
    async fn delete_cascade(
        &self,
        id: &CategoryId,
        records: &[CategoryRecord],
    ) -> Result<DeleteCategoryResponseDto> {
        let deleted = descendants_leaves_first(id, records);

        if let Err(e) = self.store.delete_categories(&deleted).await {
            tracing::error!(
                "Cascade delete of {} ({} categories) failed: {}",
                id,
                deleted.len(),
                e
            );
            return Err(e.into());
        }

        Ok(DeleteCategoryResponseDto {
            policy: DeletePolicy::Cascade,
            deleted,
            reparented: Vec::new(),
        })
    }

    /// Children move to the deleted node's parent; undone if any step fails
    async fn delete_reparent(
        &self,
        target: &CategoryRecord,
        children: &[&CategoryRecord],
        records: &[CategoryRecord],
    ) -> Result<DeleteCategoryResponseDto> {
        let mut moved: Vec<&CategoryRecord> = Vec::with_capacity(children.len());

        for &child in children {
            // A missing grandparent, or one that is the child itself, leaves the child at root
            let new_parent = target
                .parent_id
                .clone()
                .filter(|p| p != &child.id && p != &target.id && contains(records, p));
            let edit = CategoryEditInput::reparent(child, new_parent);
            if let Err(e) = self.store.update_category(&child.id, &edit).await {
                tracing::error!("Failed to reparent {} off {}: {}", child.id, target.id, e);
                self.undo_reparent(&moved, &target.id).await;
                return Err(e.into());
            }
            moved.push(child);
        }

        if let Err(e) = self.store.delete_category(&target.id).await {
            tracing::error!("Failed to delete {} after reparenting: {}", target.id, e);
            self.undo_reparent(&moved, &target.id).await;
            return Err(e.into());
        }

        Ok(DeleteCategoryResponseDto {
            policy: DeletePolicy::Reparent,
            deleted: vec![target.id.clone()],
            reparented: moved.iter().map(|c| c.id.clone()).collect(),
        })
    }

    async fn undo_reparent(&self, moved: &[&CategoryRecord], original_parent: &CategoryId) {
        for &child in moved.iter().rev() {
            let edit = CategoryEditInput::reparent(child, Some(original_parent.clone()));
            if let Err(e) = self.store.update_category(&child.id, &edit).await {
                tracing::error!(
                    "Failed to restore {} under {}: {}",
                    child.id,
                    original_parent,
                    e
                );
            }
        }
    }
}

fn find<'a>(records: &'a [CategoryRecord], id: &CategoryId) -> Option<&'a CategoryRecord> {
    records.iter().find(|r| &r.id == id)
}

fn contains(records: &[CategoryRecord], id: &CategoryId) -> bool {
    find(records, id).is_some()
}

fn not_found(id: &CategoryId) -> AppError {
    AppError::NotFound(format!("Category '{}' not found", id))
}

fn parent_not_found(id: &CategoryId) -> AppError {
    AppError::ParentNotFound(format!("Parent category '{}' does not exist", id))
}
