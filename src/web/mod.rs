//! Web page retrieval for `/tldr <url>`

pub mod extract;
pub mod fetch;

pub use extract::extract_content;
pub use fetch::{HttpPageFetcher, PageFetcher};

use url::Url;

/// True iff `candidate` is an absolute `http`/`https` URL with a host.
#[must_use]
pub fn is_url(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return false;
    }

    Url::parse(trimmed).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}
