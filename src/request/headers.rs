//! Header templates for API and web page requests

use std::collections::BTreeMap;

/// Header names carrying the signature triple
pub const SIGNATURE_HEADERS: [&str; 3] = ["x-s", "x-t", "x-s-common"];

/// Header names carrying trace ids
pub const TRACE_HEADERS: [&str; 2] = ["x-b3-traceid", "x-xray-traceid"];

const API_TEMPLATE: &[(&str, &str)] = &[
    ("authority", "edith.xiaohongshu.com"),
    ("accept", "application/json, text/plain, */*"),
    (
        "accept-language",
        "zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6",
    ),
    ("cache-control", "no-cache"),
    ("content-type", "application/json;charset=UTF-8"),
    ("origin", "https://www.xiaohongshu.com"),
    ("pragma", "no-cache"),
    ("referer", "https://www.xiaohongshu.com/"),
    (
        "sec-ch-ua",
        "\"Not A(Brand\";v=\"99\", \"Microsoft Edge\";v=\"121\", \"Chromium\";v=\"121\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-site"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36 Edg/121.0.0.0",
    ),
    ("x-mns", "unload"),
];

const PAGE_TEMPLATE: &[(&str, &str)] = &[
    ("authority", "www.xiaohongshu.com"),
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
    ),
    ("accept-language", "zh-CN,zh;q=0.9"),
    ("cache-control", "no-cache"),
    ("pragma", "no-cache"),
    ("referer", "https://www.xiaohongshu.com/"),
    (
        "sec-ch-ua",
        "\"Chromium\";v=\"122\", \"Not(A:Brand\";v=\"24\", \"Google Chrome\";v=\"122\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "same-origin"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    ),
];

/// Base headers for signed API calls, without signature or trace fields
pub fn api_headers() -> BTreeMap<String, String> {
    to_map(API_TEMPLATE)
}

/// Headers for a browser-style navigation to a web page
pub fn page_headers() -> BTreeMap<String, String> {
    to_map(PAGE_TEMPLATE)
}

fn to_map(template: &[(&str, &str)]) -> BTreeMap<String, String> {
    template
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
