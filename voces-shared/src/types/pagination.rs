use serde::{Deserialize, Serialize};

const MAX_PER_PAGE: u64 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 { 1 }
fn default_per_page() -> u64 { 20 }

impl PaginationParams {
    /// Offset uses the capped page size so page windows stay contiguous
    /// even when the client asks for more than MAX_PER_PAGE.
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.limit()
    }

    /// Clamped to 1..=MAX_PER_PAGE; a zero page size would otherwise
    /// divide by zero when computing total pages.
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, per_page: 20 }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, params: &PaginationParams) -> Self {
        let per_page = params.limit();
        let total_pages = if total == 0 { 0 } else { total.div_ceil(per_page) };
        Self {
            items,
            total,
            page: params.page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_capped_limit() {
        let params = PaginationParams { page: 3, per_page: 500 };
        assert_eq!(params.limit(), MAX_PER_PAGE);
        assert_eq!(params.offset(), 2 * MAX_PER_PAGE);
    }

    #[test]
    fn zero_per_page_is_clamped_to_one() {
        let params = PaginationParams { page: 1, per_page: 0 };
        assert_eq!(params.limit(), 1);

        let page: Paginated<u32> = Paginated::new(vec![], 5, &params);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.total_pages, 5);
    }

    #[test]
    fn total_pages_rounds_up() {
        let params = PaginationParams { page: 1, per_page: 20 };
        let page: Paginated<u32> = Paginated::new(vec![], 41, &params);
        assert_eq!(page.total_pages, 3);

        let empty: Paginated<u32> = Paginated::new(vec![], 0, &params);
        assert_eq!(empty.total_pages, 0);
    }
}
