//! User profile and per-user note listings

use crate::client::{XhsClient, IMAGE_FORMATS_QUERY};
use crate::paging::{Limit, PageResult, PageShape};
use crate::url::{extract_tokens, UrlTokens, SOURCE_SEARCH, SOURCE_USER};
use crate::Result;
use serde_json::Value;
use tracing::info;

const USER_OTHER_INFO: &str = "/api/sns/web/v1/user/otherinfo";
const USER_SELF_INFO: &str = "/api/sns/web/v1/user/selfinfo";
const USER_ME: &str = "/api/sns/web/v2/user/me";
const USER_POSTED: &str = "/api/sns/web/v1/user_posted";
const USER_LIKED: &str = "/api/sns/web/v1/note/like/page";
const USER_COLLECTED: &str = "/api/sns/web/v2/note/collect/page";

/// Notes per user listing page
const USER_NOTES_PAGE_SIZE: &str = "30";

/// User listings end either on `has_more = false` or on an empty page
const USER_NOTES_SHAPE: PageShape = PageShape::cursor("notes").stopping_on_empty();

/// The three per-user note listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoteListing {
    Posted,
    Liked,
    Collected,
}

impl NoteListing {
    fn path(self) -> &'static str {
        match self {
            Self::Posted => USER_POSTED,
            Self::Liked => USER_LIKED,
            Self::Collected => USER_COLLECTED,
        }
    }

    /// `xsec_source` used when the profile URL carries none
    fn default_source(self) -> &'static str {
        match self {
            Self::Posted | Self::Collected => SOURCE_SEARCH,
            Self::Liked => SOURCE_USER,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Posted => "posted",
            Self::Liked => "liked",
            Self::Collected => "collected",
        }
    }
}

impl XhsClient {
    /// Fetches another user's profile
    pub async fn user_info(&self, user_id: &str) -> Result<Value> {
        self.get(USER_OTHER_INFO, &[("target_user_id", user_id)])
            .await
    }

    /// Fetches the logged-in user's profile
    pub async fn self_info(&self) -> Result<Value> {
        self.get(USER_SELF_INFO, &[]).await
    }

    /// Fetches the logged-in user's profile from the v2 endpoint
    pub async fn self_info_v2(&self) -> Result<Value> {
        self.get(USER_ME, &[]).await
    }

    /// Fetches one page of the notes a user posted
    pub async fn user_posted_page(
        &self,
        user: &UrlTokens,
        cursor: &str,
    ) -> Result<PageResult<Value>> {
        self.user_notes_page(NoteListing::Posted, user, cursor)
            .await
    }

    /// Fetches one page of the notes a user liked
    pub async fn user_liked_page(&self, user: &UrlTokens, cursor: &str) -> Result<PageResult<Value>> {
        self.user_notes_page(NoteListing::Liked, user, cursor).await
    }

    /// Fetches one page of the notes a user collected
    pub async fn user_collected_page(
        &self,
        user: &UrlTokens,
        cursor: &str,
    ) -> Result<PageResult<Value>> {
        self.user_notes_page(NoteListing::Collected, user, cursor)
            .await
    }

    /// Collects the notes a user posted
    ///
    /// # Arguments
    ///
    /// * `url` - Profile URL, e.g. `https://www.xiaohongshu.com/user/profile/<id>?xsec_token=...`
    /// * `limit` - How many notes to collect
    pub async fn user_notes(&self, url: &str, limit: Limit) -> Result<Vec<Value>> {
        self.collect_user_notes(NoteListing::Posted, url, limit)
            .await
    }

    /// Collects the notes a user liked
    pub async fn user_liked_notes(&self, url: &str, limit: Limit) -> Result<Vec<Value>> {
        self.collect_user_notes(NoteListing::Liked, url, limit)
            .await
    }

    /// Collects the notes a user collected
    pub async fn user_collected_notes(&self, url: &str, limit: Limit) -> Result<Vec<Value>> {
        self.collect_user_notes(NoteListing::Collected, url, limit)
            .await
    }

    async fn user_notes_page(
        &self,
        listing: NoteListing,
        user: &UrlTokens,
        cursor: &str,
    ) -> Result<PageResult<Value>> {
        let path = listing.path();
        let data = self
            .get(
                path,
                &[
                    ("num", USER_NOTES_PAGE_SIZE),
                    ("cursor", cursor),
                    ("user_id", user.resource_id.as_str()),
                    ("image_formats", IMAGE_FORMATS_QUERY),
                    ("xsec_token", user.security_token.as_str()),
                    ("xsec_source", user.security_source.as_str()),
                ],
            )
            .await?;

        USER_NOTES_SHAPE.parse(path, &data)
    }

    async fn collect_user_notes(
        &self,
        listing: NoteListing,
        url: &str,
        limit: Limit,
    ) -> Result<Vec<Value>> {
        let user = extract_tokens(url, listing.default_source())?;
        let user = &user;

        let notes = self
            .collector()
            .collect(limit, |cursor| async move {
                self.user_notes_page(listing, user, &cursor).await
            })
            .await?;

        info!(
            user_id = %user.resource_id,
            listing = listing.name(),
            notes = notes.len(),
            "Collected user notes"
        );
        Ok(notes)
    }
}
