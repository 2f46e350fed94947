use crate::FetchError;

/// Result of one page fetch or image download
///
/// Failures are values, not errors: the crawler logs them and moves on, and
/// tests can match on them directly.
#[derive(Debug)]
pub enum CrawlOutcome<T> {
    /// The item was fetched; carries what it produced
    Success(T),

    /// The page was fetched but holds no image reference
    NotFound,

    /// Non-OK status, transport failure or local write failure
    Failed(FetchError),
}

impl<T> CrawlOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the success value, if any
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}
