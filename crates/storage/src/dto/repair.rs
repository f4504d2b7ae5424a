use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::common::{DEFAULT_PAGE_SIZE, PaginationParams};
use crate::models::RepairRecord;

// ASCII digits only; `\d` would also accept other Unicode digits.
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("valid date regex"));
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year regex"));

/// Request payload for registering a new repair.
///
/// Missing or null text fields deserialize as empty strings so that every
/// absent required field is reported by validation instead of failing
/// extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRepairRequest {
    /// Entry date, `dd/mm/yyyy`
    #[validate(custom(function = "validate_date"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub entry_date: String,

    /// Exit date, `dd/mm/yyyy`
    #[validate(custom(function = "validate_date"))]
    pub exit_date: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 120, message = "mechanic name must be at most 120 characters"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub mechanic_name: String,

    #[validate(range(min = 0, message = "mechanic years of experience must not be negative"))]
    pub mechanic_years_experience: Option<i32>,

    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 80, message = "vehicle brand must be at most 80 characters"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub vehicle_brand: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 120, message = "vehicle model must be at most 120 characters"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub vehicle_model: String,

    /// Four-digit model year
    #[validate(custom(function = "validate_year"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub vehicle_year: String,

    #[validate(length(max = 40, message = "vehicle color must be at most 40 characters"))]
    pub vehicle_color: Option<String>,
}

/// Partial update of a repair. Absent or null fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRepairRequest {
    #[validate(custom(function = "validate_date"))]
    pub entry_date: Option<String>,

    #[validate(custom(function = "validate_date"))]
    pub exit_date: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 120, message = "mechanic name must be at most 120 characters"))]
    pub mechanic_name: Option<String>,

    #[validate(range(min = 0, message = "mechanic years of experience must not be negative"))]
    pub mechanic_years_experience: Option<i32>,

    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 80, message = "vehicle brand must be at most 80 characters"))]
    pub vehicle_brand: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 120, message = "vehicle model must be at most 120 characters"))]
    pub vehicle_model: Option<String>,

    #[validate(custom(function = "validate_year"))]
    pub vehicle_year: Option<String>,

    #[validate(length(max = 40, message = "vehicle color must be at most 40 characters"))]
    pub vehicle_color: Option<String>,
}

/// Full view of a repair record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepairResponse {
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

/// Condensed view used by the summary listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepairSummary {
    pub id: i64,
    pub entry_date: String,
    pub exit_date: Option<String>,
    pub mechanic_name: String,
    pub vehicle_brand: String,
    pub vehicle_model: String,
}

/// Brand/model substring filter. Both terms are case-insensitive and ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairFilter {
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl RepairFilter {
    pub fn new(brand: Option<String>, model: Option<String>) -> Self {
        Self { brand, model }
    }

    pub fn brand_term(&self) -> Option<&str> {
        non_empty_term(self.brand.as_deref())
    }

    pub fn model_term(&self) -> Option<&str> {
        non_empty_term(self.model.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.brand_term().is_none() && self.model_term().is_none()
    }

    pub fn matches(&self, record: &RepairRecord) -> bool {
        contains_ignore_case(&record.vehicle_brand, self.brand_term())
            && contains_ignore_case(&record.vehicle_model, self.model_term())
    }
}

fn non_empty_term(term: Option<&str>) -> Option<&str> {
    term.map(str::trim).filter(|t| !t.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// Query string accepted by the repair listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RepairListQuery {
    /// 0-based page number
    #[serde(default = "default_page")]
    pub page: u32,
    /// Records per page, 1 to 100 (`size` is accepted too)
    #[serde(default = "default_page_size", alias = "size", alias = "page_size")]
    pub page_size: u32,
    /// Case-insensitive substring of the vehicle brand
    pub brand: Option<String>,
    /// Case-insensitive substring of the vehicle model
    pub model: Option<String>,
}

impl Default for RepairListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            brand: None,
            model: None,
        }
    }
}

fn default_page() -> u32 {
    0
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl RepairListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.page_size)
    }

    pub fn filter(&self) -> RepairFilter {
        RepairFilter::new(self.brand.clone(), self.model.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        self.pagination().validate()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    if DATE_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(error_with_message(
            "invalid_date",
            "date must match the dd/mm/yyyy pattern",
        ))
    }
}

fn validate_year(value: &str) -> Result<(), ValidationError> {
    if YEAR_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(error_with_message(
            "invalid_year",
            "vehicle year must have exactly 4 digits",
        ))
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error_with_message("blank", "must not be blank"))
    } else {
        Ok(())
    }
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

impl From<RepairRecord> for RepairResponse {
    fn from(record: RepairRecord) -> Self {
        Self {
            id: record.id,
            entry_date: record.entry_date,
            exit_date: record.exit_date,
            mechanic_name: record.mechanic_name,
            mechanic_years_experience: record.mechanic_years_experience,
            vehicle_brand: record.vehicle_brand,
            vehicle_model: record.vehicle_model,
            vehicle_year: record.vehicle_year,
            vehicle_color: record.vehicle_color,
            active: record.active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<&RepairRecord> for RepairSummary {
    fn from(record: &RepairRecord) -> Self {
        Self {
            id: record.id,
            entry_date: record.entry_date.clone(),
            exit_date: record.exit_date.clone(),
            mechanic_name: record.mechanic_name.clone(),
            vehicle_brand: record.vehicle_brand.clone(),
            vehicle_model: record.vehicle_model.clone(),
        }
    }
}
