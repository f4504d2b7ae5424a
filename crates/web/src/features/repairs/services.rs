use storage::{
    dto::repair::{CreateRepairRequest, RepairListQuery, RepairSummary, UpdateRepairRequest},
    error::Result,
    models::RepairRecord,
    repository::RepairStore,
};

/// Register a new repair
pub async fn create_repair(
    store: &dyn RepairStore,
    request: &CreateRepairRequest,
) -> Result<RepairRecord> {
    let record = store.create(request).await?;
    tracing::info!(repair_id = record.id, "Repair created");
    Ok(record)
}

/// Get an active repair by id
pub async fn get_repair(store: &dyn RepairStore, id: i64) -> Result<RepairRecord> {
    store.find_active_by_id(id).await.inspect_err(|e| {
        if e.is_not_found() {
            tracing::debug!(repair_id = id, "Repair not found or inactive");
        }
    })
}

/// List active repairs, filtered by brand/model when the query carries a term
pub async fn list_repairs(
    store: &dyn RepairStore,
    query: &RepairListQuery,
) -> Result<(Vec<RepairRecord>, i64)> {
    let filter = query.filter();
    let pagination = query.pagination();

    if filter.is_empty() {
        store.list_active(&pagination).await
    } else {
        store.list_active_filtered(&filter, &pagination).await
    }
}

/// Apply a partial update to an active repair
pub async fn update_repair(
    store: &dyn RepairStore,
    id: i64,
    request: &UpdateRepairRequest,
) -> Result<RepairRecord> {
    let record = store.update(id, request).await?;
    tracing::info!(repair_id = id, "Repair updated");
    Ok(record)
}

/// Soft-delete a repair
pub async fn delete_repair(store: &dyn RepairStore, id: i64) -> Result<()> {
    store.deactivate(id).await?;
    tracing::info!(repair_id = id, "Repair deactivated");
    Ok(())
}

/// Condensed listing of active repairs
pub async fn list_summaries(store: &dyn RepairStore) -> Result<Vec<RepairSummary>> {
    store.list_summaries().await
}
