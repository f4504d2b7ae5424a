use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// 0-based page request; page 0 is the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!("pageSize must be between 1 and {MAX_PAGE_SIZE}"));
        }
        Ok(())
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = if page_size == 0 || total_items <= 0 {
            0
        } else {
            (total_items as u64).div_ceil(u64::from(page_size)) as u32
        };
        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: PaginationParams, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(pagination.page, pagination.page_size, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_zero_on_first_page() {
        let params = PaginationParams::new(0, 10);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_offset_skips_previous_pages() {
        assert_eq!(PaginationParams::new(2, 25).offset(), 50);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(PaginationParams::new(0, 0).validate().is_err());
        assert!(PaginationParams::new(0, MAX_PAGE_SIZE + 1).validate().is_err());
        assert!(PaginationParams::new(0, MAX_PAGE_SIZE).validate().is_ok());
    }

    #[test]
    fn test_first_page_is_page_zero() {
        assert!(PaginationParams::new(0, 10).validate().is_ok());
        assert_eq!(PaginationParams::default().offset(), 0);
        assert_eq!(PaginationParams::new(1, 10).offset(), 10);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(PaginationMeta::new(0, 10, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(0, 10, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(0, 10, 11).total_pages, 2);
    }
}
