//! Pagination and search primitives for registry list views.

use serde::{Deserialize, Serialize};

/// Default page size for registry list views.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Sort direction, serialized the way the registry expects it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a paged, searchable, sortable list request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// 0-based page index.
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<SortDir>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            search: None,
            sort_by: None,
            sort_dir: None,
        }
    }
}

impl PageRequest {
    /// First page with the default size.
    pub fn first() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the search text; blank input clears it.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let s = search.into();
        let s = s.trim();
        self.search = (!s.is_empty()).then(|| s.to_string());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort_by: impl Into<String>, sort_dir: SortDir) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_dir = Some(sort_dir);
        self
    }

    /// Query pairs in the registry's wire names.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ref sort_by) = self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_dir) = self.sort_dir {
            pairs.push(("sortDir", sort_dir.as_str().to_string()));
        }
        pairs
    }
}

/// One page of a registry list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    /// 0-based index of this page.
    #[serde(default, alias = "number")]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    /// Whether a page exists after this one.
    pub const fn has_more(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
            total_elements: 0,
            page: 0,
            size: 0,
        }
    }
}

/// Cursor-paged slice of the MCP Central catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
