//! Page and image locators
//!
//! Both locators are absolute URLs resolved against the configured APOD base
//! URL (`https://apod.nasa.gov/apod/` in production).

use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Default location of the APOD archive
pub const APOD_BASE_URL: &str = "https://apod.nasa.gov/apod/";

/// URL of the daily page for one date, e.g. `.../apod/ap220101.html`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageLocator(Url);

impl PageLocator {
    /// Builds the page URL for `date` as `{base}ap{YYMMDD}.html`
    ///
    /// # Example
    ///
    /// ```
    /// use apod_crawler::locator::PageLocator;
    /// use chrono::NaiveDate;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://apod.nasa.gov/apod/").unwrap();
    /// let date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    /// let page = PageLocator::for_date(&base, date).unwrap();
    /// assert_eq!(page.as_str(), "https://apod.nasa.gov/apod/ap220103.html");
    /// ```
    pub fn for_date(base: &Url, date: NaiveDate) -> Result<Self, url::ParseError> {
        let page = format!("ap{}.html", date.format("%y%m%d"));
        base.join(&page).map(Self)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// URL of an image referenced from a daily page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageLocator(Url);

impl ImageLocator {
    /// Resolves an extracted image path such as `image/2201/foo.jpg` against the base URL
    pub fn from_path(base: &Url, image_path: &str) -> Result<Self, url::ParseError> {
        base.join(image_path).map(Self)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Last non-empty path segment, used as the local file name
    pub fn file_name(&self) -> Option<&str> {
        self.0
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
    }

    /// Local path this image is written to: `target_dir` joined with [`file_name`](Self::file_name)
    pub fn download_target(&self, target_dir: &Path) -> Option<PathBuf> {
        self.file_name().map(|name| target_dir.join(name))
    }
}

impl fmt::Display for ImageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
