use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Asc,
    #[default]
    #[serde(alias = "desc")]
    Desc,
}

impl SortDirection {
    /// PostgREST spelling used in `order=` parameters.
    pub fn as_postgrest(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// One page of results plus the metadata callers need to render paging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> PagedResult<T> {
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total_items: u64) -> Self {
        Self {
            data,
            page,
            per_page,
            total_items,
            total_pages: total_pages(total_items, per_page),
        }
    }
}

/// `ceil(total_items / per_page)`, zero when `per_page` is zero.
pub fn total_pages(total_items: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(per_page))
}

/// Zero-based row offset of a 1-indexed page.
pub fn page_offset(page: u32, per_page: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(2, 10), 10);
        assert_eq!(page_offset(0, 10), 0);
    }

    #[test]
    fn test_sort_direction_serde() {
        let asc: SortDirection = serde_json::from_str("\"ASC\"").unwrap();
        assert_eq!(asc, SortDirection::Asc);
        assert_eq!(SortDirection::default(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.as_postgrest(), "desc");
    }
}
