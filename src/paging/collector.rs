//! The cursor-walk driver shared by every paginated aggregate

use crate::paging::{Limit, PageResult, PagingPolicy};
use crate::{Result, XhsError};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Repeatedly invokes a single-page fetch and accumulates its items
///
/// # Walk
///
/// | Condition after a page | Action |
/// |------------------------|--------|
/// | Fetch failed | Stop, propagate the error, drop partial items |
/// | No items field | Stop, return what was accumulated |
/// | No cursor | Append items, stop |
/// | Limit reached | Append items, stop |
/// | `has_more` is false | Append items, stop |
/// | Otherwise | Append items, fetch the next cursor |
///
/// Items are kept in arrival order without deduplication and truncated to
/// the limit at the end; pages are always fetched whole. A cursor that does
/// not advance is not detected as such: the page cap of the
/// [`PagingPolicy`] is what ends such a walk.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    policy: PagingPolicy,
    cancel: CancellationToken,
}

impl Collector {
    /// Creates a collector bound to a cancellation token
    pub fn new(policy: PagingPolicy, cancel: CancellationToken) -> Self {
        Self { policy, cancel }
    }

    /// Returns the paging policy
    pub fn policy(&self) -> PagingPolicy {
        self.policy
    }

    /// Returns the token that aborts in-flight collections
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Collects items starting from an empty cursor
    ///
    /// # Example
    ///
    /// ```
    /// use xhs_crawler::paging::{Collector, Limit, PageResult};
    ///
    /// # async fn example() -> xhs_crawler::Result<()> {
    /// let collector = Collector::default();
    /// let items = collector
    ///     .collect(Limit::Count(3), |cursor| async move {
    ///         let page: u32 = cursor.parse().unwrap_or(0);
    ///         Ok(PageResult::more(vec![page; 2], (page + 1).to_string()))
    ///     })
    ///     .await?;
    /// assert_eq!(items, vec![0, 0, 1]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn collect<T, F, Fut>(&self, limit: Limit, fetch: F) -> Result<Vec<T>>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<PageResult<T>>>,
    {
        self.collect_from(limit, String::new(), fetch).await
    }

    /// Collects items starting from the given cursor
    ///
    /// `Limit::Count(0)` still fetches one page.
    pub async fn collect_from<T, F, Fut>(
        &self,
        limit: Limit,
        seed: String,
        mut fetch: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<PageResult<T>>>,
    {
        let mut cursor = seed;
        let mut accumulated = Vec::new();
        let mut pages = 0u32;

        loop {
            if pages >= self.policy.max_pages {
                return Err(XhsError::PageLimitExceeded {
                    max_pages: self.policy.max_pages,
                });
            }

            let page = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(XhsError::Cancelled),
                page = fetch(cursor.clone()) => page?,
            };
            pages += 1;

            let Some(items) = page.items else {
                debug!(pages, collected = accumulated.len(), "Page has no items, stopping");
                break;
            };

            debug!(
                page = pages,
                items = items.len(),
                has_more = page.has_more,
                "Fetched page"
            );
            accumulated.extend(items);

            let Some(next) = page.cursor else {
                debug!(pages, collected = accumulated.len(), "Page has no cursor, stopping");
                break;
            };
            cursor = next;

            if limit.is_satisfied(accumulated.len()) || !page.has_more {
                break;
            }
        }

        limit.truncate(&mut accumulated);
        Ok(accumulated)
    }
}
