//! Cursor-based pagination
//!
//! Every list endpoint of the platform pages its results, but they disagree
//! on how a walk ends: some clear a `has_more` flag, some drop the cursor
//! field, some drop the items field altogether. This module has:
//! - [`PageShape`]: where an endpoint keeps its items, cursor and has-more flag
//! - [`PageResult`]: one decoded page
//! - [`Collector`]: the single cursor-walk driver all aggregates use

mod collector;
mod shape;

pub use collector::Collector;
pub use shape::PageShape;

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Page items in arrival order; `None` when the response had no items field
    pub items: Option<Vec<T>>,

    /// Cursor for the next page; `None` when the response omitted it
    pub cursor: Option<String>,

    /// Whether the server reports more pages
    pub has_more: bool,
}

impl<T> PageResult<T> {
    /// A page with items, a next cursor and `has_more = true`
    pub fn more(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items: Some(items),
            cursor: Some(cursor.into()),
            has_more: true,
        }
    }

    /// A terminal page (`has_more = false`)
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items: Some(items),
            cursor: Some(String::new()),
            has_more: false,
        }
    }
}

/// How many items a collection should gather
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Stop once at least this many items arrived, then truncate to it
    Count(usize),
    /// Walk until the endpoint reports the end
    Unbounded,
}

impl Limit {
    /// Returns true once `collected` items satisfy the limit
    pub fn is_satisfied(&self, collected: usize) -> bool {
        match self {
            Self::Count(required) => collected >= *required,
            Self::Unbounded => false,
        }
    }

    /// Drops overshoot beyond the limit, keeping order
    pub fn truncate<T>(&self, items: &mut Vec<T>) {
        if let Self::Count(required) = self {
            items.truncate(*required);
        }
    }
}

impl From<Option<usize>> for Limit {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::Unbounded, Self::Count)
    }
}

/// Safety limits applied to every collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingPolicy {
    /// Maximum pages fetched before the walk is abandoned
    pub max_pages: u32,
}

impl Default for PagingPolicy {
    fn default() -> Self {
        Self { max_pages: 1000 }
    }
}
