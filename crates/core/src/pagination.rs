//! Pagination clamps and the exhaustive-scan page math.
//!
//! Listing endpoints take 1-based `page` / `page_size` query parameters;
//! invariant-bearing scans (reconciliation, per-student detail sums)
//! must visit every row, so batch offsets are computed up front from a
//! count instead of trusting a single capped query.

/// Default page size when the client omits one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound for client-requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 100;
/// Batch size used by exhaustive scans (the store-side page cap).
pub const SCAN_BATCH_SIZE: i64 = 100;

/// Clamp a 1-based page number (anything below 1 becomes 1).
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// SQL OFFSET for a clamped page/page_size pair.
pub fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

/// Offsets for an exhaustive batched scan over `total` rows.
///
/// Every offset is a multiple of [`SCAN_BATCH_SIZE`]; consuming all of
/// them with `LIMIT SCAN_BATCH_SIZE` visits each row exactly once.
pub fn scan_offsets(total: i64) -> Vec<i64> {
    (0..total.max(0))
        .step_by(SCAN_BATCH_SIZE as usize)
        .collect()
}

/// A page of results plus the total row count for the filter.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Paged<T> {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub list: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_to_one() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-5)), 1);
        assert_eq!(clamp_page(Some(3)), 3);
    }

    #[test]
    fn page_size_clamps_to_bounds() {
        assert_eq!(clamp_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(0)), 1);
        assert_eq!(clamp_page_size(Some(500)), MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(offset(1, 20), 0);
        assert_eq!(offset(3, 20), 40);
    }

    #[test]
    fn scan_offsets_cover_every_row() {
        assert_eq!(scan_offsets(0), Vec::<i64>::new());
        assert_eq!(scan_offsets(1), vec![0]);
        assert_eq!(scan_offsets(100), vec![0]);
        assert_eq!(scan_offsets(101), vec![0, 100]);
        assert_eq!(scan_offsets(250), vec![0, 100, 200]);
    }
}
