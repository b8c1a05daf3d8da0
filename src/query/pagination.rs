//! Pagination calculator: page/limit parameters plus a total count become an
//! offset/limit pair and next/prev page descriptors.

use serde::Serialize;

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub page: i64,
    pub limit: i64,
}

/// Next/prev descriptors; a side that does not apply is omitted from the
/// serialized payload entirely, not emitted as null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Defaults apply when a parameter is absent or non-numeric. The limit is
    /// capped at the configured maximum page size.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let query = &config::config().query;
        Self::from_raw_with(page, limit, query.default_limit, query.max_limit)
    }

    pub fn from_raw_with(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: i64,
        max_limit: i64,
    ) -> Self {
        let page = page
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);
        let limit = limit
            .and_then(|l| l.parse::<i64>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .min(max_limit);

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Build the next/prev descriptors for a total matching count.
    pub fn paginate(&self, total: i64) -> Pagination {
        let start_index = self.offset();
        let end_index = self.page * self.limit;

        let mut pagination = Pagination::default();
        if end_index < total {
            pagination.next = Some(PageRef {
                page: self.page + 1,
                limit: self.limit,
            });
        }
        if start_index > 0 {
            pagination.prev = Some(PageRef {
                page: self.page - 1,
                limit: self.limit,
            });
        }
        pagination
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: i64, limit: i64) -> PageParams {
        PageParams { page, limit }
    }

    #[test]
    fn first_page_of_57_has_next_only() {
        let pagination = params(1, 25).paginate(57);
        assert_eq!(pagination.next, Some(PageRef { page: 2, limit: 25 }));
        assert_eq!(pagination.prev, None);
    }

    #[test]
    fn last_page_of_57_has_prev_only() {
        let pagination = params(3, 25).paginate(57);
        assert_eq!(pagination.next, None);
        assert_eq!(pagination.prev, Some(PageRef { page: 2, limit: 25 }));
    }

    #[test]
    fn middle_page_has_both() {
        let pagination = params(2, 25).paginate(57);
        assert!(pagination.next.is_some());
        assert!(pagination.prev.is_some());
    }

    #[test]
    fn single_page_has_neither_and_serializes_empty() {
        let pagination = params(1, 25).paginate(10);
        assert_eq!(pagination, Pagination::default());
        assert_eq!(serde_json::to_value(&pagination).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn non_numeric_params_fall_back_to_defaults() {
        let p = PageParams::from_raw_with(Some("abc"), Some("-3"), 25, 100);
        assert_eq!(p, params(1, 25));

        let p = PageParams::from_raw_with(None, None, 25, 100);
        assert_eq!(p, params(1, 25));
    }

    #[test]
    fn limit_is_capped() {
        let p = PageParams::from_raw_with(Some("2"), Some("5000"), 25, 100);
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset(), 100);
    }
}
