//! Property-based tests for the page cursor

use lgpd_mobile::shared::pagination::Pagination;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_always_at_least_one_page(count in 0u64..1_000_000, page_size in 0u32..500) {
        let mut pagination = Pagination::new(page_size);
        pagination.count = count;
        prop_assert!(pagination.total_pages() >= 1);
        prop_assert!(u64::from(pagination.total_pages()) * u64::from(pagination.page_size) >= count);
    }

    #[test]
    fn test_clamp_keeps_page_in_range(count in 0u64..10_000, page_size in 1u32..100, page in 1u32..500) {
        let mut pagination = Pagination::new(page_size);
        pagination.page = page;
        pagination.count = count;
        let moved = pagination.clamp();
        prop_assert!(pagination.page >= 1);
        prop_assert!(pagination.page <= pagination.total_pages());
        prop_assert_eq!(moved, page > pagination.total_pages());
    }

    #[test]
    fn test_go_to_never_leaves_range(count in 0u64..10_000, page_size in 1u32..100, target in 0u32..1_000) {
        let mut pagination = Pagination::new(page_size);
        pagination.count = count;
        pagination.go_to(target);
        prop_assert!(pagination.page >= 1 && pagination.page <= pagination.total_pages());
    }
}
