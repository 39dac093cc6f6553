//! Comment trees
//!
//! A note's comments come from two endpoints: a paginated list of top-level
//! comments, each carrying a short preview of its replies, and a paginated
//! reply list per top-level comment. [`CommentTreeAssembler`] stitches them
//! into [`CommentNode`]s.

mod assembler;

pub use assembler::CommentTreeAssembler;

use crate::paging::PageResult;
use crate::url::UrlTokens;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One comment as returned by the platform
///
/// Fields the crawler does not interpret (author, timestamps, like counts,
/// pictures) are kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,

    /// Note the comment belongs to
    #[serde(default)]
    pub note_id: String,

    #[serde(default)]
    pub content: String,

    /// Cursor for the next page of replies
    #[serde(default)]
    pub sub_comment_cursor: Option<String>,

    /// Whether replies beyond the preview exist
    #[serde(default)]
    pub sub_comment_has_more: bool,

    /// Reply preview embedded in the top-level page
    #[serde(default)]
    pub sub_comments: Vec<Comment>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Comment {
    /// Whether replies beyond the preview are waiting to be fetched
    pub fn has_more_replies(&self) -> bool {
        self.sub_comment_has_more
    }
}

/// A top-level comment with its fully collected replies
///
/// `replies` is only filled for comments that reported more replies than
/// their preview; for the others it stays empty and no reply page is
/// fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,

    pub replies: Vec<Comment>,
}

impl CommentNode {
    /// A node whose replies were not expanded
    pub fn unexpanded(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.comment.id
    }

    /// Note id the comment hangs off
    pub fn parent_resource_id(&self) -> &str {
        &self.comment.note_id
    }

    pub fn reply_cursor(&self) -> Option<&str> {
        self.comment.sub_comment_cursor.as_deref()
    }

    pub fn has_more_replies(&self) -> bool {
        self.comment.has_more_replies()
    }
}

/// Single-page comment fetches the assembler is built on
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Fetches one page of a note's top-level comments
    async fn top_level_page(&self, note: &UrlTokens, cursor: String)
        -> Result<PageResult<Comment>>;

    /// Fetches one page of replies to `parent`
    async fn reply_page(
        &self,
        note: &UrlTokens,
        parent: &Comment,
        cursor: String,
    ) -> Result<PageResult<Comment>>;
}
