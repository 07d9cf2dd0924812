use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::{IntoParams, ToSchema};

use surgical_academy_data::models::PageRequest;

/// Page size used when the caller does not pass `limit`
pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// Largest accepted `limit`
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination block returned with every list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self { page, limit, total, pages }
    }
}

/// `page` and `limit` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "with-api", derive(IntoParams))]
#[cfg_attr(feature = "with-api", into_params(parameter_in = Query))]
pub struct PageQuery {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default 12, at most 100)
    pub limit: Option<u64>,
}

impl PageQuery {
    /// Resolve defaults and bounds into `(page, limit)`.
    ///
    /// Page 0 is rejected; `limit` is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn resolve(&self) -> Result<(u64, u64), String> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err("page must be 1 or greater".to_string());
        }
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        Ok((page, limit))
    }

    pub fn window(&self) -> Result<(u64, u64, PageRequest), String> {
        let (page, limit) = self.resolve()?;
        Ok((page, limit, PageRequest::for_page(page, limit)))
    }
}

/// Query parameters of the course list
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "with-api", derive(IntoParams))]
#[cfg_attr(feature = "with-api", into_params(parameter_in = Query))]
pub struct CourseQuery {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default 12, at most 100)
    pub limit: Option<u64>,
    /// Category slug
    pub category: Option<String>,
    /// BEGINNER, INTERMEDIATE, ADVANCED or EXPERT
    pub difficulty: Option<String>,
    /// Case-insensitive match on title or description
    pub search: Option<String>,
    /// `true` to list featured courses only
    pub featured: Option<String>,
}

/// Query parameters of the article list
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "with-api", derive(IntoParams))]
#[cfg_attr(feature = "with-api", into_params(parameter_in = Query))]
pub struct ArticleQuery {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default 12, at most 100)
    pub limit: Option<u64>,
    /// Category slug
    pub category: Option<String>,
    /// Case-insensitive match on title, content or excerpt
    pub search: Option<String>,
}

impl CourseQuery {
    pub fn paging(&self) -> PageQuery {
        PageQuery { page: self.page, limit: self.limit }
    }
}

impl ArticleQuery {
    pub fn paging(&self) -> PageQuery {
        PageQuery { page: self.page, limit: self.limit }
    }
}

/// Treat missing and blank filter values alike
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}
