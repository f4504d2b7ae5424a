use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RepairStore;
use crate::dto::common::PaginationParams;
use crate::dto::repair::{CreateRepairRequest, RepairFilter, RepairSummary, UpdateRepairRequest};
use crate::error::{Result, StorageError};
use crate::models::RepairRecord;

/// In-memory repair store for tests and local development.
///
/// Records live in an id-ordered map behind one lock, so every operation is
/// applied atomically with respect to concurrent callers.
#[derive(Default)]
pub struct InMemoryRepairRepository {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    records: BTreeMap<i64, RepairRecord>,
}

impl InMemoryRepairRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

#[async_trait]
impl RepairStore for InMemoryRepairRepository {
    async fn create(&self, req: &CreateRepairRequest) -> Result<RepairRecord> {
        let mut inner = self.inner.write().await;

        inner.last_id += 1;
        let created_at = now();
        let record = RepairRecord {
            id: inner.last_id,
            entry_date: req.entry_date.clone(),
            exit_date: req.exit_date.clone(),
            mechanic_name: req.mechanic_name.clone(),
            mechanic_years_experience: req.mechanic_years_experience,
            vehicle_brand: req.vehicle_brand.clone(),
            vehicle_model: req.vehicle_model.clone(),
            vehicle_year: req.vehicle_year.clone(),
            vehicle_color: req.vehicle_color.clone(),
            active: true,
            created_at,
            updated_at: created_at,
        };
        inner.records.insert(record.id, record.clone());

        Ok(record)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<RepairRecord> {
        let inner = self.inner.read().await;

        inner
            .records
            .get(&id)
            .filter(|record| record.active)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn find_by_id(&self, id: i64) -> Result<RepairRecord> {
        let inner = self.inner.read().await;

        inner
            .records
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_active_filtered(
        &self,
        filter: &RepairFilter,
        pagination: &PaginationParams,
    ) -> Result<(Vec<RepairRecord>, i64)> {
        let inner = self.inner.read().await;

        let matching: Vec<&RepairRecord> = inner
            .records
            .values()
            .filter(|record| record.active && filter.matches(record))
            .collect();

        let total_items = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .cloned()
            .collect();

        Ok((page, total_items))
    }

    async fn update(&self, id: i64, patch: &UpdateRepairRequest) -> Result<RepairRecord> {
        let mut inner = self.inner.write().await;

        let record = inner
            .records
            .get_mut(&id)
            .filter(|record| record.active)
            .ok_or(StorageError::NotFound)?;

        record.apply_patch(patch);
        record.updated_at = now();

        Ok(record.clone())
    }

    async fn deactivate(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;

        let record = inner.records.get_mut(&id).ok_or(StorageError::NotFound)?;
        record.active = false;
        record.updated_at = now();

        Ok(())
    }

    async fn list_summaries(&self) -> Result<Vec<RepairSummary>> {
        let inner = self.inner.read().await;

        Ok(inner
            .records
            .values()
            .filter(|record| record.active)
            .map(RepairSummary::from)
            .collect())
    }
}
