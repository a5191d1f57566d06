//! Classification of raw dropped or pasted content into an item kind.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::ItemKind;

static IMAGE_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp|svg|bmp|avif)$").expect("valid image regex")
});

static HTTP_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("valid url regex"));

/// Classifies a raw string into the kind of item it should become.
///
/// Returns the kind and the trimmed content, or `None` for blank input.
pub fn classify_content(raw: &str) -> Option<(ItemKind, String)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let kind = if HTTP_URL.is_match(trimmed) {
        if IMAGE_EXTENSION.is_match(trimmed) {
            ItemKind::Image
        } else {
            ItemKind::Url
        }
    } else if trimmed.starts_with("data:image/") {
        ItemKind::Image
    } else {
        ItemKind::Text
    };

    Some((kind, trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_urls() {
        let (kind, content) = classify_content("  https://cdn.example.com/a/b.JPG ").unwrap();
        assert_eq!(kind, ItemKind::Image);
        assert_eq!(content, "https://cdn.example.com/a/b.JPG");
        assert_eq!(
            classify_content("http://x.io/p.avif").unwrap().0,
            ItemKind::Image
        );
    }

    #[test]
    fn test_page_urls() {
        assert_eq!(
            classify_content("https://are.na/block/123").unwrap().0,
            ItemKind::Url
        );
        // Extension must end the string
        assert_eq!(
            classify_content("https://x.io/p.png?w=200").unwrap().0,
            ItemKind::Url
        );
    }

    #[test]
    fn test_data_uri_is_image() {
        assert_eq!(
            classify_content("data:image/png;base64,iVBORw0KGgo=").unwrap().0,
            ItemKind::Image
        );
    }

    #[test]
    fn test_everything_else_is_text() {
        assert_eq!(
            classify_content("velvet, smoke, late-night jazz").unwrap().0,
            ItemKind::Text
        );
        assert_eq!(classify_content("ftp://old.site").unwrap().0, ItemKind::Text);
    }

    #[test]
    fn test_blank_is_rejected() {
        assert!(classify_content("").is_none());
        assert!(classify_content(" \n\t").is_none());
    }
}
