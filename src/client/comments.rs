//! Comment endpoints and the comment tree entry point

use crate::client::{XhsClient, IMAGE_FORMATS_QUERY};
use crate::comments::{Comment, CommentNode, CommentSource, CommentTreeAssembler};
use crate::paging::{PageResult, PageShape};
use crate::url::{extract_tokens, UrlTokens, SOURCE_SEARCH};
use crate::Result;
use async_trait::async_trait;

const COMMENT_PAGE: &str = "/api/sns/web/v2/comment/page";
const COMMENT_SUB_PAGE: &str = "/api/sns/web/v2/comment/sub/page";

/// Replies per reply page
const REPLY_PAGE_SIZE: &str = "10";

/// Shared by top-level and reply pages; an empty page mid-walk does not end it
const COMMENT_SHAPE: PageShape = PageShape::cursor("comments");

impl XhsClient {
    /// Fetches one page of a note's top-level comments
    pub async fn top_level_comments_page(
        &self,
        note: &UrlTokens,
        cursor: &str,
    ) -> Result<PageResult<Comment>> {
        let data = self
            .get(
                COMMENT_PAGE,
                &[
                    ("note_id", note.resource_id.as_str()),
                    ("cursor", cursor),
                    ("top_comment_id", ""),
                    ("image_formats", IMAGE_FORMATS_QUERY),
                    ("xsec_token", note.security_token.as_str()),
                ],
            )
            .await?;

        COMMENT_SHAPE.parse(COMMENT_PAGE, &data)
    }

    /// Fetches one page of replies to a top-level comment
    pub async fn reply_comments_page(
        &self,
        note: &UrlTokens,
        comment: &Comment,
        cursor: &str,
    ) -> Result<PageResult<Comment>> {
        let note_id = if comment.note_id.is_empty() {
            note.resource_id.as_str()
        } else {
            comment.note_id.as_str()
        };

        let data = self
            .get(
                COMMENT_SUB_PAGE,
                &[
                    ("note_id", note_id),
                    ("root_comment_id", comment.id.as_str()),
                    ("num", REPLY_PAGE_SIZE),
                    ("cursor", cursor),
                    ("image_formats", IMAGE_FORMATS_QUERY),
                    ("top_comment_id", ""),
                    ("xsec_token", note.security_token.as_str()),
                ],
            )
            .await?;

        COMMENT_SHAPE.parse(COMMENT_SUB_PAGE, &data)
    }

    /// Collects a note's full comment tree
    ///
    /// # Arguments
    ///
    /// * `url` - Note URL carrying the note id and its `xsec_token`
    pub async fn note_comments(&self, url: &str) -> Result<Vec<CommentNode>> {
        let note = extract_tokens(url, SOURCE_SEARCH)?;

        CommentTreeAssembler::new(self, self.collector().clone())
            .with_concurrency(self.reply_concurrency)
            .assemble(&note)
            .await
    }
}

#[async_trait]
impl CommentSource for XhsClient {
    async fn top_level_page(
        &self,
        note: &UrlTokens,
        cursor: String,
    ) -> Result<PageResult<Comment>> {
        self.top_level_comments_page(note, &cursor).await
    }

    async fn reply_page(
        &self,
        note: &UrlTokens,
        parent: &Comment,
        cursor: String,
    ) -> Result<PageResult<Comment>> {
        self.reply_comments_page(note, parent, &cursor).await
    }
}
