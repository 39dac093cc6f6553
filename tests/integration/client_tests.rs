use crate::support::{client, ok};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xhs_crawler::transport::RetryPolicy;
use xhs_crawler::{ErrorKind, Limit};

#[tokio::test]
async fn test_signed_headers_and_cookies_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v1/user/selfinfo"))
        .and(header("cookie", "a1=tok123; web_session=sess456"))
        .and(header("x-s", "sig-0"))
        .and(header("x-t", "1700000000000"))
        .and(header("x-s-common", "common"))
        .and(header("x-b3-traceid", "aaaaaaaaaaaaaaaa"))
        .and(header("x-xray-traceid", "xray-fixed"))
        .and(header("origin", "https://www.xiaohongshu.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!({ "basic_info": { "nickname": "me" } }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let info = client.self_info().await.expect("selfinfo failed");

    assert_eq!(info["basic_info"]["nickname"], "me");
}

#[tokio::test]
async fn test_remote_rejection_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/unread_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "code": -100,
            "msg": "登录已过期"
        })))
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let err = client.unread_count().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteRejected);
    assert!(err.to_string().contains("登录已过期"));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/unread_count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let err = client.unread_count().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_user_notes_paginate_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v1/user_posted"))
        .and(query_param("cursor", ""))
        .and(query_param("user_id", "u1"))
        .and(query_param("num", "30"))
        .and(query_param("xsec_token", "T1"))
        .and(query_param("xsec_source", "pc_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "notes": [{ "note_id": "a" }, { "note_id": "b" }],
            "cursor": "c2",
            "has_more": true
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v1/user_posted"))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "notes": [{ "note_id": "c" }],
            "cursor": "c3",
            "has_more": false
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let (client, oracle) = client(&server);
    let notes = client
        .user_notes(
            "https://www.xiaohongshu.com/user/profile/u1?xsec_token=T1",
            Limit::Count(10),
        )
        .await
        .expect("user_notes failed");

    let ids: Vec<&str> = notes.iter().filter_map(|n| n["note_id"].as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(oracle.calls(), 2);
}

#[tokio::test]
async fn test_failed_page_fails_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v1/you/likes"))
        .and(query_param("cursor", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "message_list": [1, 2],
            "cursor": "next",
            "has_more": true
        }))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v1/you/likes"))
        .and(query_param("cursor", "next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "code": 300012,
            "msg": "访问频次异常"
        })))
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let err = client.likes(Limit::Unbounded).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteRejected);
    assert!(err.to_string().contains("访问频次异常"));
}

#[tokio::test]
async fn test_server_error_is_retried_and_re_signed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/user/me"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/user/me"))
        .and(header("x-s", "sig-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({ "user_id": "me" }))))
        .expect(1)
        .mount(&server)
        .await;

    let (client, oracle) = client(&server);
    let client = client.with_retry(RetryPolicy::new(
        2,
        Duration::from_millis(1),
        Duration::from_millis(5),
    ));

    let me = client.self_info_v2().await.expect("retry did not recover");
    assert_eq!(me["user_id"], "me");
    assert_eq!(oracle.calls(), 2);
}

#[tokio::test]
async fn test_server_error_without_retry_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v2/user/me"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let err = client.self_info_v2().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn test_note_card_posts_compact_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sns/web/v1/feed"))
        .and(header("content-type", "application/json;charset=UTF-8"))
        .and(body_json(json!({
            "source_note_id": "n1",
            "image_formats": ["jpg", "webp", "avif"],
            "extra": { "need_body_topic": "1" },
            "xsec_source": "pc_search",
            "xsec_token": "T1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "items": [{ "id": "n1", "note_card": { "title": "咖啡" } }]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let card = client
        .note_card("https://www.xiaohongshu.com/explore/n1?xsec_token=T1")
        .await
        .expect("note_card failed");

    assert_eq!(card["title"], "咖啡");
}

#[tokio::test]
async fn test_video_url_from_meta_tag() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/explore/n1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head>
                    <meta name="og:video" content="http://sns-video-bd.xhscdn.com/stream/n1.mp4">
                    </head><body></body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let video = client.note_video_url("n1").await.expect("video lookup failed");

    assert_eq!(video, "http://sns-video-bd.xhscdn.com/stream/n1.mp4");
}

#[tokio::test]
async fn test_missing_video_page_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/explore/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let err = client.note_video_url("gone").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}
