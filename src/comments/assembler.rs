use crate::comments::{Comment, CommentNode, CommentSource};
use crate::paging::{Collector, Limit};
use crate::url::UrlTokens;
use crate::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

/// Builds two-level comment trees for a note
///
/// # Phases
///
/// 1. Collect every top-level comment, starting from an empty cursor.
/// 2. For each top-level comment, in order, that reports more replies than
///    its preview: collect its replies starting from the comment's own reply
///    cursor and attach them. Other comments are passed through without any
///    call.
///
/// A failure in either phase fails the whole assembly. Phase 2 may expand up
/// to `concurrency` comments at once; node order and reply order are kept
/// regardless.
pub struct CommentTreeAssembler<'a> {
    source: &'a dyn CommentSource,
    collector: Collector,
    concurrency: usize,
}

impl<'a> CommentTreeAssembler<'a> {
    /// Creates an assembler expanding one comment at a time
    pub fn new(source: &'a dyn CommentSource, collector: Collector) -> Self {
        Self {
            source,
            collector,
            concurrency: 1,
        }
    }

    /// Sets how many comments phase 2 expands concurrently (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Collects the full comment tree of a note
    pub async fn assemble(&self, note: &UrlTokens) -> Result<Vec<CommentNode>> {
        let top_level = self
            .collector
            .collect(Limit::Unbounded, |cursor| {
                self.source.top_level_page(note, cursor)
            })
            .await?;

        let to_expand = top_level.iter().filter(|c| c.has_more_replies()).count();
        debug!(
            note_id = %note.resource_id,
            top_level = top_level.len(),
            to_expand,
            "Collected top-level comments"
        );

        let nodes: Vec<CommentNode> = stream::iter(top_level)
            .map(|comment| self.expand(note, comment))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        info!(
            note_id = %note.resource_id,
            comments = nodes.len(),
            replies = nodes.iter().map(|n| n.replies.len()).sum::<usize>(),
            "Assembled comment tree"
        );

        Ok(nodes)
    }

    async fn expand(&self, note: &UrlTokens, comment: Comment) -> Result<CommentNode> {
        let mut node = CommentNode::unexpanded(comment);
        if !node.has_more_replies() {
            return Ok(node);
        }

        let seed = node.reply_cursor().unwrap_or_default().to_string();
        let parent = &node.comment;
        let replies = self
            .collector
            .collect_from(Limit::Unbounded, seed, |cursor| {
                self.source.reply_page(note, parent, cursor)
            })
            .await?;

        debug!(comment_id = %node.id(), replies = replies.len(), "Expanded replies");

        node.replies = replies;
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::PageResult;
    use crate::url::SOURCE_SEARCH;
    use crate::XhsError;
    use async_trait::async_trait;
    use serde_json::Map;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn comment(id: &str, has_more: bool, cursor: Option<&str>) -> Comment {
        Comment {
            id: id.to_string(),
            note_id: "n1".to_string(),
            content: format!("comment {}", id),
            sub_comment_cursor: cursor.map(str::to_string),
            sub_comment_has_more: has_more,
            sub_comments: Vec::new(),
            extra: Map::new(),
        }
    }

    fn note() -> UrlTokens {
        UrlTokens {
            resource_id: "n1".to_string(),
            security_token: "T".to_string(),
            security_source: SOURCE_SEARCH.to_string(),
        }
    }

    /// Serves canned pages keyed by cursor and records every reply call
    #[derive(Default)]
    struct FakeSource {
        top_level: HashMap<String, PageResult<Comment>>,
        replies: HashMap<(String, String), PageResult<Comment>>,
        reply_calls: Mutex<Vec<(String, String)>>,
        fail_replies_for: Option<String>,
    }

    #[async_trait]
    impl CommentSource for FakeSource {
        async fn top_level_page(
            &self,
            _note: &UrlTokens,
            cursor: String,
        ) -> Result<PageResult<Comment>> {
            Ok(self.top_level[&cursor].clone())
        }

        async fn reply_page(
            &self,
            _note: &UrlTokens,
            parent: &Comment,
            cursor: String,
        ) -> Result<PageResult<Comment>> {
            self.reply_calls
                .lock()
                .unwrap()
                .push((parent.id.clone(), cursor.clone()));

            if self.fail_replies_for.as_deref() == Some(parent.id.as_str()) {
                return Err(XhsError::RemoteRejected {
                    path: "/api/sns/web/v2/comment/sub/page".to_string(),
                    code: Some(-1),
                    message: "reply fetch failed".to_string(),
                });
            }
            Ok(self.replies[&(parent.id.clone(), cursor)].clone())
        }
    }

    fn two_page_source() -> FakeSource {
        let mut source = FakeSource::default();
        source.top_level.insert(
            String::new(),
            PageResult::more(vec![comment("a", false, None), comment("b", true, Some("b1"))], "p2"),
        );
        source.top_level.insert(
            "p2".to_string(),
            PageResult::last(vec![comment("c", true, Some("c1"))]),
        );
        source.replies.insert(
            ("b".to_string(), "b1".to_string()),
            PageResult::more(vec![comment("b-r1", false, None)], "b2"),
        );
        source.replies.insert(
            ("b".to_string(), "b2".to_string()),
            PageResult::last(vec![comment("b-r2", false, None)]),
        );
        source.replies.insert(
            ("c".to_string(), "c1".to_string()),
            PageResult::last(vec![comment("c-r1", false, None)]),
        );
        source
    }

    fn ids(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_assembles_tree_in_order() {
        let source = two_page_source();
        let nodes = CommentTreeAssembler::new(&source, Collector::default())
            .assemble(&note())
            .await
            .unwrap();

        let top: Vec<&str> = nodes.iter().map(CommentNode::id).collect();
        assert_eq!(top, vec!["a", "b", "c"]);
        assert!(nodes[0].replies.is_empty());
        assert_eq!(ids(&nodes[1].replies), vec!["b-r1", "b-r2"]);
        assert_eq!(ids(&nodes[2].replies), vec!["c-r1"]);
    }

    #[tokio::test]
    async fn test_replies_are_seeded_with_comment_cursor() {
        let source = two_page_source();
        CommentTreeAssembler::new(&source, Collector::default())
            .assemble(&note())
            .await
            .unwrap();

        let calls = source.reply_calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                ("b".to_string(), "b1".to_string()),
                ("b".to_string(), "b2".to_string()),
                ("c".to_string(), "c1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_top_level_page_does_not_end_walk() {
        let mut source = FakeSource::default();
        source.top_level.insert(
            String::new(),
            PageResult::more(vec![comment("a", false, None)], "p2"),
        );
        source
            .top_level
            .insert("p2".to_string(), PageResult::more(Vec::new(), "p3"));
        source.top_level.insert(
            "p3".to_string(),
            PageResult::last(vec![comment("b", false, None)]),
        );

        let nodes = CommentTreeAssembler::new(&source, Collector::default())
            .assemble(&note())
            .await
            .unwrap();

        let top: Vec<&str> = nodes.iter().map(CommentNode::id).collect();
        assert_eq!(top, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_comment_without_more_replies_costs_no_calls() {
        let mut source = FakeSource::default();
        source.top_level.insert(
            String::new(),
            PageResult::last(vec![comment("a", false, Some("ignored"))]),
        );

        let nodes = CommentTreeAssembler::new(&source, Collector::default())
            .assemble(&note())
            .await
            .unwrap();

        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].replies.is_empty());
        assert!(source.reply_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reply_failure_aborts_assembly() {
        let mut source = two_page_source();
        source.fail_replies_for = Some("c".to_string());

        let err = CommentTreeAssembler::new(&source, Collector::default())
            .assemble(&note())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::RemoteRejected);
        assert!(err.to_string().contains("reply fetch failed"));
    }

    #[tokio::test]
    async fn test_concurrent_expansion_keeps_order() {
        let source = two_page_source();
        let nodes = CommentTreeAssembler::new(&source, Collector::default())
            .with_concurrency(4)
            .assemble(&note())
            .await
            .unwrap();

        let top: Vec<&str> = nodes.iter().map(CommentNode::id).collect();
        assert_eq!(top, vec!["a", "b", "c"]);
        assert_eq!(ids(&nodes[1].replies), vec!["b-r1", "b-r2"]);
    }
}
