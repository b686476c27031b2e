//! List responses and paging state.
//!
//! The backend answers list endpoints either with a bare JSON array or with a
//! DRF page object (`count`, `next`, `previous`, `results`). Both collapse
//! into [`Page`].

use serde::de::DeserializeOwned;
use serde_json::Value;

/// One normalized page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            count: 0,
            next: None,
            previous: None,
        }
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Never fails: rows that do not decode are skipped, unknown shapes give an empty page.
    pub fn from_value(data: &Value) -> Self {
        match data {
            Value::Array(items) => {
                let results = decode_rows(items);
                Page {
                    count: results.len() as u64,
                    results,
                    next: None,
                    previous: None,
                }
            }
            Value::Object(obj) => {
                let results = obj
                    .get("results")
                    .and_then(Value::as_array)
                    .map(|items| decode_rows(items))
                    .unwrap_or_default();
                let count = obj
                    .get("count")
                    .and_then(Value::as_u64)
                    .unwrap_or(results.len() as u64);
                Page {
                    results,
                    count,
                    next: string_field(obj.get("next")),
                    previous: string_field(obj.get("previous")),
                }
            }
            _ => Page::default(),
        }
    }
}

fn decode_rows<T: DeserializeOwned>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::warn!("[LIST] Skipping row that does not decode: {}", e);
                None
            }
        })
        .collect()
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Page cursor shared by every paginated screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            count: 0,
            next: None,
            previous: None,
        }
    }

    /// Query parameters for the current page.
    pub fn params(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ]
    }

    /// Record the metadata of a freshly loaded page.
    pub fn absorb<T>(&mut self, page: &Page<T>) {
        self.count = page.count;
        self.next = page.next.clone();
        self.previous = page.previous.clone();
    }

    /// Forget the metadata after a failed load.
    pub fn reset_counts(&mut self) {
        self.count = 0;
        self.next = None;
        self.previous = None;
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.count.div_ceil(u64::from(self.page_size));
        pages.clamp(1, u64::from(u32::MAX)) as u32
    }

    pub fn can_prev(&self) -> bool {
        self.previous.is_some() || self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.next.is_some() || self.page < self.total_pages()
    }

    /// Jump to `page`; out-of-range targets are ignored. Returns whether the page changed.
    pub fn go_to(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages() || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Changing the page size restarts at page 1.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Pull the cursor back when rows disappeared. Returns whether the page changed.
    pub fn clamp(&mut self) -> bool {
        let total = self.total_pages();
        if self.page > total {
            self.page = total;
            true
        } else {
            false
        }
    }
}
