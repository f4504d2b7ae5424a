use async_trait::async_trait;

use crate::dto::common::PaginationParams;
use crate::dto::repair::{CreateRepairRequest, RepairFilter, RepairSummary, UpdateRepairRequest};
use crate::error::Result;
use crate::models::RepairRecord;

pub mod memory;
pub mod repair;

pub use memory::InMemoryRepairRepository;
pub use repair::RepairRepository;

/// Persistence operations over repair records.
///
/// Every read path except [`RepairStore::find_by_id`] and
/// [`RepairStore::deactivate`] only sees records whose `active` flag is set.
/// Records are never physically removed.
#[async_trait]
pub trait RepairStore: Send + Sync {
    /// Insert a new active record and return it with its assigned id.
    async fn create(&self, request: &CreateRepairRequest) -> Result<RepairRecord>;

    /// Fetch an active record.
    async fn find_active_by_id(&self, id: i64) -> Result<RepairRecord>;

    /// Fetch a record whatever its active flag.
    async fn find_by_id(&self, id: i64) -> Result<RepairRecord>;

    /// One page of active records matching `filter`, in id order, with the
    /// total number of matching active records.
    async fn list_active_filtered(
        &self,
        filter: &RepairFilter,
        pagination: &PaginationParams,
    ) -> Result<(Vec<RepairRecord>, i64)>;

    /// One page of active records in id order, with the active total.
    async fn list_active(&self, pagination: &PaginationParams) -> Result<(Vec<RepairRecord>, i64)> {
        self.list_active_filtered(&RepairFilter::default(), pagination)
            .await
    }

    /// Apply a partial update to an active record.
    async fn update(&self, id: i64, patch: &UpdateRepairRequest) -> Result<RepairRecord>;

    /// Clear the active flag. Succeeds for records that are already inactive.
    async fn deactivate(&self, id: i64) -> Result<()>;

    /// Condensed view of every active record, in id order.
    async fn list_summaries(&self) -> Result<Vec<RepairSummary>>;
}
