//! Notification endpoints: unread counters, mentions, likes and new followers

use crate::client::XhsClient;
use crate::paging::{Limit, PageResult, PageShape};
use crate::Result;
use serde_json::Value;
use tracing::info;

const UNREAD_COUNT: &str = "/api/sns/web/unread_count";
const MENTIONS: &str = "/api/sns/web/v1/you/mentions";
const LIKES: &str = "/api/sns/web/v1/you/likes";
const CONNECTIONS: &str = "/api/sns/web/v1/you/connections";

const MESSAGES_PAGE_SIZE: &str = "20";

const MESSAGES_SHAPE: PageShape = PageShape::cursor("message_list");

impl XhsClient {
    /// Fetches unread notification counters
    pub async fn unread_count(&self) -> Result<Value> {
        self.get(UNREAD_COUNT, &[]).await
    }

    /// Fetches one page of comment and @ mentions
    pub async fn mentions_page(&self, cursor: &str) -> Result<PageResult<Value>> {
        self.messages_page(MENTIONS, cursor).await
    }

    /// Fetches one page of likes and collects on the user's notes
    pub async fn likes_page(&self, cursor: &str) -> Result<PageResult<Value>> {
        self.messages_page(LIKES, cursor).await
    }

    /// Fetches one page of new followers
    pub async fn connections_page(&self, cursor: &str) -> Result<PageResult<Value>> {
        self.messages_page(CONNECTIONS, cursor).await
    }

    pub async fn mentions(&self, limit: Limit) -> Result<Vec<Value>> {
        self.collect_messages(MENTIONS, limit).await
    }

    pub async fn likes(&self, limit: Limit) -> Result<Vec<Value>> {
        self.collect_messages(LIKES, limit).await
    }

    pub async fn connections(&self, limit: Limit) -> Result<Vec<Value>> {
        self.collect_messages(CONNECTIONS, limit).await
    }

    async fn messages_page(&self, path: &str, cursor: &str) -> Result<PageResult<Value>> {
        let data = self
            .get(path, &[("num", MESSAGES_PAGE_SIZE), ("cursor", cursor)])
            .await?;
        MESSAGES_SHAPE.parse(path, &data)
    }

    async fn collect_messages(&self, path: &str, limit: Limit) -> Result<Vec<Value>> {
        let messages = self
            .collector()
            .collect(limit, |cursor| async move {
                self.messages_page(path, &cursor).await
            })
            .await?;

        info!(path, messages = messages.len(), "Collected notifications");
        Ok(messages)
    }
}
