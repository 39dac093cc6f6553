//! Keyword suggestions, note search and user search

use crate::client::{XhsClient, IMAGE_FORMATS};
use crate::paging::{Limit, PageResult, PageShape};
use crate::request::encode_query_value;
use crate::signing::hex_id;
use crate::{Result, XhsError};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

const SEARCH_RECOMMEND: &str = "/api/sns/web/v1/search/recommend";
const SEARCH_NOTES: &str = "/api/sns/web/v1/search/notes";
const SEARCH_USERS: &str = "/api/sns/web/v1/search/usersearch";

const NOTES_PAGE_SIZE: u32 = 20;
const USERS_PAGE_SIZE: u32 = 15;

/// Length of the random search session id
const SEARCH_ID_LEN: usize = 21;

/// Length of the random prefix of a user-search request id
const REQUEST_ID_PREFIX_LEN: usize = 8;

const NOTES_SHAPE: PageShape = PageShape::numbered("items");
const USERS_SHAPE: PageShape = PageShape::numbered("users");

macro_rules! search_tag {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $index:literal => $tag:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            /// Tag value the search endpoint expects
            pub fn tag(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag),+
                }
            }

            /// Looks the option up by the web client's numeric index
            pub fn from_index(index: u8) -> Option<Self> {
                match index {
                    $($index => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

search_tag! {
    /// Result ordering
    SortType {
        General = 0 => "general",
        Latest = 1 => "time_descending",
        MostLiked = 2 => "popularity_descending",
        MostCommented = 3 => "comment_descending",
        MostCollected = 4 => "collect_descending",
    }
}

search_tag! {
    /// Video notes, image notes or both
    FilterNoteType {
        Any = 0 => "不限",
        Video = 1 => "视频笔记",
        Normal = 2 => "普通笔记",
    }
}

search_tag! {
    /// Publish time window
    FilterNoteTime {
        Any = 0 => "不限",
        Day = 1 => "一天内",
        Week = 2 => "一周内",
        HalfYear = 3 => "半年内",
    }
}

search_tag! {
    /// Restriction to notes seen, unseen or from followed users
    FilterNoteRange {
        Any = 0 => "不限",
        Seen = 1 => "已看过",
        Unseen = 2 => "未看过",
        Followed = 3 => "已关注",
    }
}

search_tag! {
    /// Distance from the searcher's position
    FilterPosDistance {
        Any = 0 => "不限",
        SameCity = 1 => "同城",
        Nearby = 2 => "附近",
    }
}

/// Searcher position, required by the distance filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Filters applied to a note search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub sort: SortType,
    pub note_type: FilterNoteType,
    pub note_time: FilterNoteTime,
    pub note_range: FilterNoteRange,
    pub pos_distance: FilterPosDistance,
    pub geo: Option<GeoPoint>,
}

impl SearchFilters {
    /// Filter list in the request layout
    fn to_json(&self) -> Value {
        json!([
            { "tags": [self.sort.tag()], "type": "sort_type" },
            { "tags": [self.note_type.tag()], "type": "filter_note_type" },
            { "tags": [self.note_time.tag()], "type": "filter_note_time" },
            { "tags": [self.note_range.tag()], "type": "filter_note_range" },
            { "tags": [self.pos_distance.tag()], "type": "filter_pos_distance" },
        ])
    }

    /// The geo point as a compact JSON string, empty when unset
    fn geo_json(&self) -> Result<String> {
        match &self.geo {
            Some(geo) => serde_json::to_string(geo)
                .map_err(|e| XhsError::malformed(SEARCH_NOTES, format!("geo: {}", e))),
            None => Ok(String::new()),
        }
    }
}

/// Page number encoded in a numbered endpoint's cursor
fn page_number(cursor: &str) -> u32 {
    cursor.parse::<u32>().unwrap_or(1).max(1)
}

/// Makes a page-numbered result walkable by pointing its cursor at the next page
fn with_next_page<T>(mut page: PageResult<T>, current: u32) -> PageResult<T> {
    page.cursor = Some((current + 1).to_string());
    page
}

impl XhsClient {
    /// Fetches keyword suggestions for a partial query
    pub async fn search_keywords(&self, word: &str) -> Result<Value> {
        let keyword = encode_query_value(word);
        self.get(SEARCH_RECOMMEND, &[("keyword", keyword.as_str())])
            .await
    }

    /// Fetches one page of note search results
    ///
    /// Pages are numbered from 1. The returned cursor is the next page
    /// number.
    pub async fn search_notes_page(
        &self,
        query: &str,
        page: u32,
        filters: &SearchFilters,
    ) -> Result<PageResult<Value>> {
        let geo = filters.geo_json()?;
        let body = json!({
            "keyword": query,
            "page": page,
            "page_size": NOTES_PAGE_SIZE,
            "search_id": hex_id(self.random(), SEARCH_ID_LEN),
            "sort": "general",
            "note_type": 0,
            "ext_flags": [],
            "filters": filters.to_json(),
            "geo": geo,
            "image_formats": IMAGE_FORMATS,
        });

        let data = self.post(SEARCH_NOTES, &body).await?;
        Ok(with_next_page(NOTES_SHAPE.parse(SEARCH_NOTES, &data)?, page))
    }

    /// Fetches one page of user search results
    pub async fn search_users_page(&self, query: &str, page: u32) -> Result<PageResult<Value>> {
        let request_id = format!(
            "{}-{}",
            hex_id(self.random(), REQUEST_ID_PREFIX_LEN),
            chrono::Utc::now().timestamp_millis()
        );
        let body = json!({
            "search_user_request": {
                "keyword": query,
                "search_id": hex_id(self.random(), SEARCH_ID_LEN),
                "page": page,
                "page_size": USERS_PAGE_SIZE,
                "biz_type": "web_search_user",
                "request_id": request_id,
            }
        });

        let data = self.post(SEARCH_USERS, &body).await?;
        Ok(with_next_page(USERS_SHAPE.parse(SEARCH_USERS, &data)?, page))
    }

    /// Collects note search results
    ///
    /// Results mix notes with other cards; see
    /// [`search_result_note_urls`](crate::url::search_result_note_urls) to
    /// keep only notes.
    pub async fn search_notes(
        &self,
        query: &str,
        limit: Limit,
        filters: &SearchFilters,
    ) -> Result<Vec<Value>> {
        let notes = self
            .collector()
            .collect(limit, |cursor| async move {
                self.search_notes_page(query, page_number(&cursor), filters)
                    .await
            })
            .await?;

        info!(query, results = notes.len(), "Collected note search results");
        Ok(notes)
    }

    /// Collects user search results
    pub async fn search_users(&self, query: &str, limit: Limit) -> Result<Vec<Value>> {
        let users = self
            .collector()
            .collect(limit, |cursor| async move {
                self.search_users_page(query, page_number(&cursor)).await
            })
            .await?;

        info!(query, results = users.len(), "Collected user search results");
        Ok(users)
    }
}
