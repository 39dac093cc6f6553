//! Home feed, note detail and note media endpoints

use crate::client::{XhsClient, IMAGE_FORMATS};
use crate::paging::{Limit, PageResult, PageShape};
use crate::url::{extract_tokens, SOURCE_SEARCH};
use crate::{Result, XhsError};
use scraper::{Html, Selector};
use serde_json::{json, Value};
use tracing::info;

const HOMEFEED_CATEGORY: &str = "/api/sns/web/v1/homefeed/category";
const HOMEFEED: &str = "/api/sns/web/v1/homefeed";
const FEED: &str = "/api/sns/web/v1/feed";

/// Notes returned per home feed page
const HOMEFEED_PAGE_SIZE: u32 = 20;

/// First home feed page; later pages continue the session
const REFRESH_INITIAL: u8 = 1;
const REFRESH_CONTINUE: u8 = 3;

/// The home feed carries no has-more flag and ends with an empty page
const HOMEFEED_SHAPE: PageShape = PageShape {
    items: "items",
    cursor: Some("cursor_score"),
    has_more: None,
    stop_on_empty: true,
};

impl XhsClient {
    /// Lists the home feed channels (categories)
    pub async fn home_feed_channels(&self) -> Result<Value> {
        self.get(HOMEFEED_CATEGORY, &[]).await
    }

    /// Fetches one page of a home feed channel
    ///
    /// # Arguments
    ///
    /// * `category` - Channel id, e.g. `homefeed_recommend`
    /// * `cursor_score` - Cursor from the previous page, empty for the first
    /// * `refresh_type` - 1 for the first page, 3 for continuations
    /// * `note_index` - Number of notes already served in this session
    pub async fn home_feed_page(
        &self,
        category: &str,
        cursor_score: &str,
        refresh_type: u8,
        note_index: u32,
    ) -> Result<PageResult<Value>> {
        let body = json!({
            "cursor_score": cursor_score,
            "num": HOMEFEED_PAGE_SIZE,
            "refresh_type": refresh_type,
            "note_index": note_index,
            "unread_begin_note_id": "",
            "unread_end_note_id": "",
            "unread_note_count": 0,
            "category": category,
            "search_key": "",
            "need_num": 10,
            "image_formats": IMAGE_FORMATS,
            "need_filter_image": false,
        });

        let data = self.post(HOMEFEED, &body).await?;
        HOMEFEED_SHAPE.parse(HOMEFEED, &data)
    }

    /// Collects notes from a home feed channel
    pub async fn home_feed(&self, category: &str, limit: Limit) -> Result<Vec<Value>> {
        let mut page = 0u32;
        let notes = self
            .collector()
            .collect(limit, move |cursor| {
                let refresh_type = if page == 0 {
                    REFRESH_INITIAL
                } else {
                    REFRESH_CONTINUE
                };
                let note_index = page * HOMEFEED_PAGE_SIZE;
                page += 1;
                async move {
                    self.home_feed_page(category, &cursor, refresh_type, note_index)
                        .await
                }
            })
            .await?;

        info!(category, notes = notes.len(), "Collected home feed");
        Ok(notes)
    }

    /// Fetches the detail feed of a note
    ///
    /// The URL must carry the note id as its last path segment; its
    /// `xsec_token` and `xsec_source` are forwarded.
    pub async fn note_detail(&self, url: &str) -> Result<Value> {
        let note = extract_tokens(url, SOURCE_SEARCH)?;
        let body = json!({
            "source_note_id": note.resource_id,
            "image_formats": IMAGE_FORMATS,
            "extra": { "need_body_topic": "1" },
            "xsec_source": note.security_source,
            "xsec_token": note.security_token,
        });

        self.post(FEED, &body).await
    }

    /// Fetches a note's card: title, description, media and interaction counts
    pub async fn note_card(&self, url: &str) -> Result<Value> {
        let mut data = self.note_detail(url).await?;
        data.pointer_mut("/items/0/note_card")
            .map(Value::take)
            .ok_or_else(|| XhsError::malformed(FEED, "response has no items[0].note_card"))
    }

    /// Looks up the watermark-free video stream of a note
    ///
    /// The note's web page announces the stream in its `og:video` meta tag.
    pub async fn note_video_url(&self, note_id: &str) -> Result<String> {
        let url = format!("{}/explore/{}", self.web_base_url, note_id);
        let html = self.get_page(&url).await?;

        extract_og_video(&html)
            .ok_or_else(|| XhsError::malformed(&url, "page has no og:video meta tag"))
    }
}

/// Reads the `content` of `<meta name="og:video">`
fn extract_og_video(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("meta[name='og:video']").ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}
