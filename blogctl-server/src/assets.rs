//! Resolves stored image references into public URLs.

/// Media URL prefix used when nothing is configured
pub const DEFAULT_MEDIA_URL: &str = "/media/";

/// Asset storage rooted at a media base URL.
#[derive(Debug, Clone)]
pub struct AssetStorage {
    base_url: String,
}

impl AssetStorage {
    /// The base URL always ends with exactly one `/`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: format!("{}/", base_url.trim_end_matches('/')),
        }
    }

    /// URL of an asset, or `None` when the post has no image.
    pub fn url(&self, reference: Option<&str>) -> Option<String> {
        let reference = reference?.trim().trim_start_matches('/');
        if reference.is_empty() {
            return None;
        }
        Some(format!("{}{}", self.base_url, reference))
    }
}

impl Default for AssetStorage {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_reference_onto_base() {
        let storage = AssetStorage::new("https://cdn.example.com/media");
        assert_eq!(
            storage.url(Some("covers/cat.jpg")).as_deref(),
            Some("https://cdn.example.com/media/covers/cat.jpg")
        );
    }

    #[test]
    fn default_base_is_media() {
        assert_eq!(
            AssetStorage::default().url(Some("/a.png")).as_deref(),
            Some("/media/a.png")
        );
    }

    #[test]
    fn missing_or_blank_reference_is_none() {
        let storage = AssetStorage::default();
        assert_eq!(storage.url(None), None);
        assert_eq!(storage.url(Some("")), None);
        assert_eq!(storage.url(Some("  ")), None);
    }
}
