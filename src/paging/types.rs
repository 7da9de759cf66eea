//! Paging types
//!
//! The vocabulary shared by paging sources and the pager: page keys, load
//! requests and results, load states and the snapshot published to
//! consumers.

use crate::error::Error;
use std::sync::Arc;

/// 1-based page number used as the paging cursor
pub type PageKey = u32;

/// Key used when a load asks for "the first page"
pub const FIRST_PAGE: PageKey = 1;

/// Why a load was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadType {
    /// (Re)populate the collection from scratch
    Refresh,
    /// Fetch the next page and add it to the end
    Append,
}

/// Parameters of a single load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadParams {
    pub load_type: LoadType,
    /// `None` means the first page
    pub key: Option<PageKey>,
    /// Requested number of items; a hint, the API decides the real size
    pub load_size: usize,
}

impl LoadParams {
    /// Refresh load at `key`
    pub fn refresh(key: Option<PageKey>, load_size: usize) -> Self {
        Self {
            load_type: LoadType::Refresh,
            key,
            load_size,
        }
    }

    /// Append load at `key`
    pub fn append(key: PageKey, load_size: usize) -> Self {
        Self {
            load_type: LoadType::Append,
            key: Some(key),
            load_size,
        }
    }
}

/// One successfully loaded page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in server order
    pub data: Vec<T>,
    /// Always `None`: backward paging is not supported
    pub prev_key: Option<PageKey>,
    /// `None` once the source has no more pages
    pub next_key: Option<PageKey>,
}

/// Outcome of a load. Failures are values, never panics.
#[derive(Debug, Clone)]
pub enum LoadResult<T> {
    Page(Page<T>),
    Error(Arc<Error>),
}

impl<T> LoadResult<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, LoadResult::Error(_))
    }

    pub fn page(&self) -> Option<&Page<T>> {
        match self {
            LoadResult::Page(page) => Some(page),
            LoadResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            LoadResult::Page(_) => None,
            LoadResult::Error(err) => Some(err.as_ref()),
        }
    }
}

/// Status of the refresh or the append pipeline
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    NotLoading,
    Loading,
    Error(Arc<Error>),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error(_))
    }

    /// Cause of the failure, if this state is an error
    pub fn error(&self) -> Option<&Error> {
        match self {
            LoadState::Error(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

// Two error states are equal only if they carry the same failure.
impl PartialEq for LoadState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LoadState::NotLoading, LoadState::NotLoading)
            | (LoadState::Loading, LoadState::Loading) => true,
            (LoadState::Error(a), LoadState::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Bookkeeping for one loaded page, without its items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub prev_key: Option<PageKey>,
    pub next_key: Option<PageKey>,
    pub item_count: usize,
}

impl PageInfo {
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            prev_key: page.prev_key,
            next_key: page.next_key,
            item_count: page.data.len(),
        }
    }
}

/// What a source sees when asked for a refresh key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingState {
    /// Loaded pages in collection order
    pub pages: Vec<PageInfo>,
    /// Last position the consumer read, if any
    pub anchor_position: Option<usize>,
}

impl PagingState {
    /// Page that holds `position`; positions past the end map to the last page
    pub fn closest_page_to_position(&self, position: usize) -> Option<&PageInfo> {
        let mut end = 0;
        for page in &self.pages {
            end += page.item_count;
            if position < end {
                return Some(page);
            }
        }
        self.pages.last()
    }
}

/// Pager tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    /// Items per page the consumer expects
    pub page_size: usize,
    /// Append once no more than this many items remain after the read position
    pub prefetch_distance: usize,
    /// Load size hint for refresh loads
    pub initial_load_size: usize,
}

impl PagerConfig {
    /// Prefetch one page ahead; initial load three pages
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            prefetch_distance: page_size,
            initial_load_size: page_size.saturating_mul(3),
        }
    }

    #[must_use]
    pub fn with_prefetch_distance(mut self, distance: usize) -> Self {
        self.prefetch_distance = distance;
        self
    }
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self::new(20)
    }
}

/// Consistent view of a pager at one instant
#[derive(Debug, Clone)]
pub struct PagerSnapshot<T> {
    /// Every successfully loaded page, concatenated in fetch order
    pub items: Arc<Vec<T>>,
    pub refresh: LoadState,
    pub append: LoadState,
    /// Key the next append would load
    pub next_key: Option<PageKey>,
    /// A page came back empty; no further appends will happen
    pub end_of_pagination_reached: bool,
    pub pages_loaded: usize,
}

impl<T> PagerSnapshot<T> {
    /// Snapshot of a pager whose first load has not finished
    pub fn loading() -> Self {
        Self {
            refresh: LoadState::Loading,
            ..Self::empty()
        }
    }

    /// Settled snapshot with nothing in it
    pub fn empty() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            refresh: LoadState::NotLoading,
            append: LoadState::NotLoading,
            next_key: None,
            end_of_pagination_reached: false,
            pages_loaded: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Either pipeline has a load in flight
    pub fn is_loading(&self) -> bool {
        self.refresh.is_loading() || self.append.is_loading()
    }

    /// First failure to report: refresh before append
    pub fn error(&self) -> Option<&Error> {
        self.refresh.error().or_else(|| self.append.error())
    }
}

impl<T> Default for PagerSnapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}
