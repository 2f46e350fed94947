//! Version and build metadata reported at startup
//!
//! Commit and build time are read from `APOD_CRAWLER_COMMIT` and
//! `APOD_CRAWLER_BUILD_TIME` at compile time, if the build sets them.

use std::fmt;

const NOT_AVAILABLE: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit_short: &'static str,
    pub build_time: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit_short: option_env!("APOD_CRAWLER_COMMIT")
                .map(short_commit)
                .unwrap_or(NOT_AVAILABLE),
            build_time: option_env!("APOD_CRAWLER_BUILD_TIME").unwrap_or(NOT_AVAILABLE),
        }
    }
}

/// First seven characters of a commit id
fn short_commit(commit: &str) -> &str {
    match commit.char_indices().nth(7) {
        Some((end, _)) => &commit[..end],
        None => commit,
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "apod-crawler {} built from commit {} @ {}",
            self.version, self.commit_short, self.build_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_format() {
        let info = BuildInfo {
            version: "1.0.0",
            commit_short: "abc1234",
            build_time: NOT_AVAILABLE,
        };
        assert_eq!(
            info.to_string(),
            "apod-crawler 1.0.0 built from commit abc1234 @ n/a"
        );
    }

    #[test]
    fn test_short_commit() {
        assert_eq!(short_commit("0123456789abcdef"), "0123456");
        assert_eq!(short_commit("abc"), "abc");
        // Multi-byte characters are never split
        assert_eq!(short_commit("ééééééééé"), "ééééééé");
    }

    #[test]
    fn test_current_uses_package_version() {
        let info = BuildInfo::current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.commit_short.len() <= 7 || info.commit_short == NOT_AVAILABLE);
    }
}
