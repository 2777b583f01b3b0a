//! Short link identifier extraction from referrer and redirect URLs.

use url::Url;

/// Recognizes URLs that point into this service's own link namespace.
///
/// A URL belongs to the namespace when it uses `https`, its host equals the
/// canonical hostname and its first path segment is non-empty. Host
/// comparison is case-insensitive: the parser lowercases the URL host and
/// the canonical hostname is lowercased on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrlExtractor {
    hostname: String,
}

impl ShortUrlExtractor {
    /// Creates an extractor for the given canonical hostname (e.g. `go.gov.sg`).
    pub fn new(hostname: impl AsRef<str>) -> Self {
        Self {
            hostname: hostname.as_ref().trim().to_ascii_lowercase(),
        }
    }

    /// The canonical hostname links are matched against.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Returns the short link identifier named by `input`, if it is ours.
    ///
    /// Malformed input is not an error: anything that does not parse as an
    /// absolute URL yields `None`, as do other schemes (including `http`),
    /// foreign hosts and URLs without an identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use link_stats::utils::short_url::ShortUrlExtractor;
    ///
    /// let extractor = ShortUrlExtractor::new("test.gov.sg");
    ///
    /// assert_eq!(
    ///     extractor.extract("https://test.gov.sg/my-url"),
    ///     Some("my-url".to_string())
    /// );
    /// assert_eq!(extractor.extract("test.gov.sg/my-url"), None);
    /// ```
    pub fn extract(&self, input: &str) -> Option<String> {
        let url = Url::parse(input).ok()?;

        if url.scheme() != "https" {
            return None;
        }

        if url.host_str()? != self.hostname {
            return None;
        }

        url.path_segments()?
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    }
}
