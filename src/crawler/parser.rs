//! Image link extraction
//!
//! APOD pages link the full-size picture with a plain anchor whose target
//! lives under `image/`. The page is never parsed as HTML; a regex finds the
//! first such anchor, which keeps extraction tolerant of the archive's older,
//! often malformed markup.

use regex::Regex;

/// Default pattern: an anchor whose target starts with `image/` and holds only
/// ASCII letters, digits, `/`, `.`, `_` and `-`
pub const DEFAULT_IMAGE_PATTERN: &str = r#"<a href="(?P<path>image/[A-Za-z0-9_/.-]+)""#;

/// Finds the image path referenced by a page
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    pattern: Regex,
}

impl LinkExtractor {
    /// Compiles `pattern`, which must define a capture group named `path`
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns the path fragment of the first matching anchor
    ///
    /// # Example
    ///
    /// ```
    /// use apod_crawler::crawler::LinkExtractor;
    ///
    /// let extractor = LinkExtractor::default();
    /// let html = r#"<p><a href="image/2201/Orion_1024.jpg"><img src="image/2201/Orion_600.jpg"></a></p>"#;
    /// assert_eq!(extractor.extract(html), Some("image/2201/Orion_1024.jpg"));
    /// ```
    pub fn extract<'a>(&self, html: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(html)
            .and_then(|captures| captures.name("path"))
            .map(|m| m.as_str())
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_PATTERN).expect("default image pattern compiles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_anchor() {
        let extractor = LinkExtractor::default();
        let html = r#"<center><a href="image/foo/bar_1024.jpg">
            <IMG SRC="image/foo/bar_600.jpg"></a></center>"#;
        assert_eq!(extractor.extract(html), Some("image/foo/bar_1024.jpg"));
    }

    #[test]
    fn test_extract_returns_first_match() {
        let extractor = LinkExtractor::default();
        let html = r#"<a href="image/2201/first.jpg">a</a> <a href="image/2201/second.jpg">b</a>"#;
        assert_eq!(extractor.extract(html), Some("image/2201/first.jpg"));
    }

    #[test]
    fn test_no_anchor_is_not_found() {
        let extractor = LinkExtractor::default();
        let html = "<html><body><p>Today's picture is a video.</p></body></html>";
        assert_eq!(extractor.extract(html), None);
    }

    #[test]
    fn test_non_image_anchor_is_ignored() {
        let extractor = LinkExtractor::default();
        let html = r#"<a href="other/page.html">Archive</a> <a href="ap220101.html">&lt;</a>"#;
        assert_eq!(extractor.extract(html), None);
    }

    #[test]
    fn test_unsafe_characters_stop_the_match() {
        let extractor = LinkExtractor::default();
        // A quote must directly follow the path
        let html = r#"<a href="image/foo bar.jpg">x</a>"#;
        assert_eq!(extractor.extract(html), None);

        let html = r#"<a href="image/x.jpg?size=large">x</a>"#;
        assert_eq!(extractor.extract(html), None);
    }

    #[test]
    fn test_non_ascii_path_does_not_match() {
        let extractor = LinkExtractor::default();
        let html = r#"<a href="image/2201/café.jpg">x</a>"#;
        assert_eq!(extractor.extract(html), None);
    }

    #[test]
    fn test_img_src_alone_does_not_match() {
        let extractor = LinkExtractor::default();
        let html = r#"<img src="image/2201/only_inline.jpg">"#;
        assert_eq!(extractor.extract(html), None);
    }

    #[test]
    fn test_custom_pattern() {
        let extractor = LinkExtractor::new(r#"<A HREF="(?P<path>image/[^"]+)""#).unwrap();
        let html = r#"<A HREF="image/9506/earth.gif">"#;
        assert_eq!(extractor.extract(html), Some("image/9506/earth.gif"));
        assert_eq!(extractor.pattern(), r#"<A HREF="(?P<path>image/[^"]+)""#);
    }
}
