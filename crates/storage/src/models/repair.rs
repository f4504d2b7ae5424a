use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::dto::repair::UpdateRepairRequest;

/// One vehicle repair job as stored in the `repairs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepairRecord {
    pub id: i64,
    pub entry_date: String,
    pub exit_date: Option<String>,
    pub mechanic_name: String,
    pub mechanic_years_experience: Option<i32>,
    pub vehicle_brand: String,
    pub vehicle_model: String,
    pub vehicle_year: String,
    pub vehicle_color: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl RepairRecord {
    /// Overwrites every field the patch carries and leaves the rest untouched.
    ///
    /// `id`, `active` and the timestamps are not part of a patch.
    pub fn apply_patch(&mut self, patch: &UpdateRepairRequest) {
        if let Some(entry_date) = &patch.entry_date {
            self.entry_date.clone_from(entry_date);
        }
        if let Some(exit_date) = &patch.exit_date {
            self.exit_date = Some(exit_date.clone());
        }
        if let Some(mechanic_name) = &patch.mechanic_name {
            self.mechanic_name.clone_from(mechanic_name);
        }
        if let Some(years) = patch.mechanic_years_experience {
            self.mechanic_years_experience = Some(years);
        }
        if let Some(vehicle_brand) = &patch.vehicle_brand {
            self.vehicle_brand.clone_from(vehicle_brand);
        }
        if let Some(vehicle_model) = &patch.vehicle_model {
            self.vehicle_model.clone_from(vehicle_model);
        }
        if let Some(vehicle_year) = &patch.vehicle_year {
            self.vehicle_year.clone_from(vehicle_year);
        }
        if let Some(vehicle_color) = &patch.vehicle_color {
            self.vehicle_color = Some(vehicle_color.clone());
        }
    }
}
