use crate::support::{client, ok};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOTE_URL: &str = "https://www.xiaohongshu.com/explore/n1?xsec_token=T1";

#[tokio::test]
async fn test_comment_tree_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/comment/page"))
        .and(query_param("note_id", "n1"))
        .and(query_param("cursor", ""))
        .and(query_param("xsec_token", "T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "comments": [
                {
                    "id": "c1",
                    "note_id": "n1",
                    "content": "quiet comment",
                    "sub_comment_has_more": false,
                    "sub_comments": []
                },
                {
                    "id": "c2",
                    "note_id": "n1",
                    "content": "busy comment",
                    "sub_comment_has_more": true,
                    "sub_comment_cursor": "r-start",
                    "sub_comments": [{ "id": "c2-0", "content": "preview" }]
                }
            ],
            "cursor": "top-2",
            "has_more": true
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/comment/page"))
        .and(query_param("cursor", "top-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "comments": [],
            "cursor": "top-3",
            "has_more": true
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/comment/page"))
        .and(query_param("cursor", "top-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "comments": [{
                "id": "c3",
                "note_id": "n1",
                "content": "late comment",
                "sub_comment_has_more": false
            }],
            "cursor": "",
            "has_more": false
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/comment/sub/page"))
        .and(query_param("root_comment_id", "c2"))
        .and(query_param("cursor", "r-start"))
        .and(query_param("num", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "comments": [{ "id": "c2-1", "content": "reply one" }],
            "cursor": "r-2",
            "has_more": true
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/comment/sub/page"))
        .and(query_param("root_comment_id", "c2"))
        .and(query_param("cursor", "r-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "comments": [{ "id": "c2-2", "content": "reply two" }],
            "cursor": "",
            "has_more": false
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/comment/sub/page"))
        .and(query_param("root_comment_id", "c1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let tree = client.note_comments(NOTE_URL).await.expect("comment tree failed");

    assert_eq!(tree.len(), 3);
    assert_eq!(tree[0].id(), "c1");
    assert!(tree[0].replies.is_empty());

    assert_eq!(tree[1].id(), "c2");
    assert_eq!(tree[1].comment.sub_comments.len(), 1);
    let replies: Vec<&str> = tree[1].replies.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(replies, vec!["c2-1", "c2-2"]);

    assert_eq!(tree[2].id(), "c3");
}

#[tokio::test]
async fn test_comment_tree_serializes_with_replies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/comment/page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "comments": [{
                "id": "c1",
                "note_id": "n1",
                "content": "hello",
                "like_count": "3",
                "sub_comment_has_more": false
            }],
            "cursor": "",
            "has_more": false
        }))))
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let tree = client.note_comments(NOTE_URL).await.expect("comment tree failed");
    let value = serde_json::to_value(&tree).unwrap();

    assert_eq!(value[0]["id"], "c1");
    assert_eq!(value[0]["like_count"], "3");
    assert_eq!(value[0]["replies"], json!([]));
}
