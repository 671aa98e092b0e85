//! Shopify cursor-based pagination via the `Link` response header.
//!
//! Each listing response carries the URL of the adjacent pages in its `Link`
//! header. The `rel="next"` URL already embeds the `page_info` cursor together
//! with the parameters Shopify allows alongside it, so it is followed as-is.
//!
//! ## Header format
//!
//! ```text
//! <https://shop.myshopify.com/admin/api/2025-07/products.json?limit=250&page_info=PREV>; rel="previous",
//! <https://shop.myshopify.com/admin/api/2025-07/products.json?limit=250&page_info=NEXT>; rel="next"
//! ```

/// Returns the `rel="next"` URL from a `Link` header, or `None` on the last
/// page (no header, or no next relation).
#[must_use]
pub fn extract_next_url(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;

    for segment in header.split(',') {
        let segment = segment.trim();
        if !segment.contains(r#"rel="next""#) {
            continue;
        }
        return extract_angle_bracket_url(segment)
            .filter(|url| !url.is_empty())
            .map(ToOwned::to_owned);
    }

    None
}

/// Extracts the URL between `<` and `>` in a link directive segment.
fn extract_angle_bracket_url(segment: &str) -> Option<&str> {
    let start = segment.find('<')? + 1;
    let end = segment.find('>')?;
    if start >= end {
        return None;
    }
    Some(&segment[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_none_when_header_is_none() {
        assert!(extract_next_url(None).is_none());
    }

    #[test]
    fn returns_none_when_header_is_empty() {
        assert!(extract_next_url(Some("")).is_none());
    }

    #[test]
    fn extracts_single_next_link() {
        let header = r#"<https://shop.myshopify.com/admin/api/2025-07/products.json?limit=250&page_info=eyJsYXN0X2lkIjo2fQ>; rel="next""#;
        assert_eq!(
            extract_next_url(Some(header)).as_deref(),
            Some("https://shop.myshopify.com/admin/api/2025-07/products.json?limit=250&page_info=eyJsYXN0X2lkIjo2fQ")
        );
    }

    #[test]
    fn extracts_next_from_combined_prev_next_link() {
        let header = concat!(
            r#"<https://shop.myshopify.com/admin/api/2025-07/collects.json?limit=250&page_info=PREV>; rel="previous", "#,
            r#"<https://shop.myshopify.com/admin/api/2025-07/collects.json?limit=250&page_info=NEXT>; rel="next""#
        );
        assert_eq!(
            extract_next_url(Some(header)).as_deref(),
            Some("https://shop.myshopify.com/admin/api/2025-07/collects.json?limit=250&page_info=NEXT")
        );
    }

    #[test]
    fn returns_none_when_only_previous_link_present() {
        let header = r#"<https://shop.myshopify.com/admin/api/2025-07/products.json?page_info=PREV>; rel="previous""#;
        assert!(extract_next_url(Some(header)).is_none());
    }

    #[test]
    fn handles_extra_whitespace_between_segments() {
        let header = concat!(
            r#"<https://example.com/p.json?page_info=ABC>; rel="previous",   "#,
            r#"  <https://example.com/p.json?page_info=XYZ>;   rel="next""#
        );
        assert_eq!(
            extract_next_url(Some(header)).as_deref(),
            Some("https://example.com/p.json?page_info=XYZ")
        );
    }

    #[test]
    fn malformed_next_segment_returns_none() {
        assert!(extract_next_url(Some(r#"https://example.com; rel="next""#)).is_none());
        assert!(extract_next_url(Some(r#"<>; rel="next""#)).is_none());
    }

    #[test]
    fn extract_angle_bracket_url_happy_path() {
        let segment = r#"<https://example.com/foo?bar=baz>; rel="next""#;
        assert_eq!(
            extract_angle_bracket_url(segment),
            Some("https://example.com/foo?bar=baz")
        );
    }

    #[test]
    fn extract_angle_bracket_url_no_brackets_returns_none() {
        assert!(extract_angle_bracket_url("no brackets here").is_none());
    }
}
