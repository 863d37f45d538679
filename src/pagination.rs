use serde::Deserialize;

/// Query parameters accepted by list endpoints. Values arrive as raw
/// strings; anything that does not parse as an integer counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Option<i64> {
        self.page.as_deref().and_then(|v| v.parse().ok())
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(|v| v.parse().ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Normalize page/limit into a bounded window. Page 1 is the first page,
/// so `offset = page * limit - limit`. A zero page resets to 1; negative
/// pages pass through and the storage engine rejects the resulting offset.
pub fn resolve_pagination(page: Option<i64>, limit: Option<i64>, max_limit: i64) -> PageWindow {
    let mut page = page.unwrap_or(1);
    let mut limit = limit.unwrap_or(10);

    if limit > max_limit || limit <= 0 {
        limit = max_limit;
    }

    if page == 0 {
        page = 1;
    }

    PageWindow {
        page,
        limit,
        offset: page * limit - limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let w = resolve_pagination(None, None, 20);
        assert_eq!(w, PageWindow { page: 1, limit: 10, offset: 0 });
    }

    #[test]
    fn zero_page_resets_to_one() {
        let w = resolve_pagination(Some(0), Some(10), 20);
        assert_eq!(w.page, 1);
        assert_eq!(w.offset, 0);
    }

    #[test]
    fn oversized_limit_is_clamped_to_max() {
        let w = resolve_pagination(Some(1), Some(25), 20);
        assert_eq!(w.limit, 20);
        assert_eq!(w.offset, 0);
    }

    #[test]
    fn non_positive_limit_is_forced_to_max() {
        assert_eq!(resolve_pagination(Some(1), Some(0), 20).limit, 20);
        assert_eq!(resolve_pagination(Some(1), Some(-5), 20).limit, 20);
    }

    #[test]
    fn second_page_offsets_by_limit() {
        let w = resolve_pagination(Some(2), Some(10), 20);
        assert_eq!(w.offset, 10);
    }

    #[test]
    fn negative_page_passes_through() {
        // Observed behavior of the resolver: no normalization of negative
        // pages. The resulting offset is rejected downstream by storage.
        let w = resolve_pagination(Some(-1), Some(10), 20);
        assert_eq!(w.page, -1);
        assert_eq!(w.offset, -20);
    }

    #[test]
    fn query_values_that_do_not_parse_count_as_absent() {
        let q = PageQuery {
            page: Some("abc".into()),
            limit: Some("2x".into()),
        };
        assert_eq!(q.page(), None);
        assert_eq!(q.limit(), None);

        let q = PageQuery {
            page: Some("3".into()),
            limit: Some("15".into()),
        };
        assert_eq!(q.page(), Some(3));
        assert_eq!(q.limit(), Some(15));
    }
}
