/// Origin host for `.jpg` paths and bare image ids
const IMAGE_ORIGIN: &str = "https://sns-img-qc.xhscdn.com";

/// Origin host for `spectrum` images, which the platform only serves re-encoded
const SPECTRUM_ORIGIN: &str = "http://sns-webpic.xhscdn.com";

/// Rewrites a CDN image URL to its un-watermarked origin form
///
/// The image id is everything after the host that identifies the file,
/// with any `!style` suffix removed:
///
/// | URL contains | Id | Result |
/// |--------------|----|--------|
/// | `.jpg` | last three path segments | `https://sns-img-qc.xhscdn.com/{id}` |
/// | `spectrum` | last two path segments | `http://sns-webpic.xhscdn.com/{id}?imageView2/2/w/format/jpg` |
/// | anything else | last path segment | `https://sns-img-qc.xhscdn.com/{id}` |
///
/// # Examples
///
/// ```
/// use xhs_crawler::url::original_image_url;
///
/// assert_eq!(
///     original_image_url("https://sns-webpic-qc.xhscdn.com/202401/abc/1040g!nd_dft_wlteh_webp_3"),
///     "https://sns-img-qc.xhscdn.com/1040g"
/// );
/// ```
pub fn original_image_url(url: &str) -> String {
    if url.contains(".jpg") {
        format!("{}/{}", IMAGE_ORIGIN, image_id(url, 3))
    } else if url.contains("spectrum") {
        format!(
            "{}/{}?imageView2/2/w/format/jpg",
            SPECTRUM_ORIGIN,
            image_id(url, 2)
        )
    } else {
        format!("{}/{}", IMAGE_ORIGIN, image_id(url, 1))
    }
}

/// Joins the last `segments` path pieces and cuts the `!style` suffix
fn image_id(url: &str, segments: usize) -> String {
    let parts: Vec<&str> = url.split('/').collect();
    let start = parts.len().saturating_sub(segments);
    let joined = parts[start..].join("/");

    match joined.split_once('!') {
        Some((id, _)) => id.to_string(),
        None => joined,
    }
}
