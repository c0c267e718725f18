use crate::{constants::MAX_PAGE_SIZE, errors::AppError};

/// A 1-based page window over a creation-ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Builds a page window from raw query values.
    ///
    /// Absent or blank values fall back to page 1 and `default_limit`.
    /// Non-numeric values are rejected; numeric values are clamped so that
    /// `page >= 1` and `1 <= limit <= MAX_PAGE_SIZE`.
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
    ) -> Result<Self, AppError> {
        let page = parse_number("page", page)?.unwrap_or(1);
        let limit = parse_number("limit", limit)?.unwrap_or(default_limit as i64);

        Ok(PageRequest {
            page: page.clamp(1, u32::MAX as i64) as u32,
            limit: limit.clamp(1, MAX_PAGE_SIZE as i64) as u32,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * (self.limit as i64)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        let limit = self.limit as i64;
        (total.max(0) + limit - 1) / limit
    }
}

fn parse_number(field: &str, raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::invalid_field(field, format!("{} must be a whole number", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let page = PageRequest::from_query(None, Some(""), 10).unwrap();
        assert_eq!(page, PageRequest { page: 1, limit: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let page = PageRequest::from_query(Some("0"), Some("-5"), 10).unwrap();
        assert_eq!(page, PageRequest { page: 1, limit: 1 });

        let page = PageRequest::from_query(Some("3"), Some("1000"), 10).unwrap();
        assert_eq!(page.limit, MAX_PAGE_SIZE);
        assert_eq!(page.offset(), 2 * MAX_PAGE_SIZE as i64);
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let err = PageRequest::from_query(Some("two"), None, 10).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref fields) if fields[0].field == "page"));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PageRequest { page: 2, limit: 2 };
        assert_eq!(page.total_pages(5), 3);
        assert_eq!(page.total_pages(4), 2);
        assert_eq!(page.total_pages(0), 0);
    }
}
