//! Update processing: routing, summarizing and replying

pub mod deliver;
pub mod handler;
pub mod router;
pub mod summarize;

pub use handler::{Outcome, TldrBot};
pub use router::CommandRouter;
pub use summarize::SummaryDispatcher;

/// Reply when there is nothing to summarize.
pub const INSUFFICIENT_DATA_MESSAGE: &str = "i need more data";

/// Reply when the page behind a `/tldr <url>` could not be retrieved.
pub const FETCH_FAILURE_MESSAGE: &str = "i couldn't fetch that page";

/// Canonical failure message shown to users when summarization fails.
pub const CANONICAL_FAILURE_MESSAGE: &str = "sorry, i couldn't generate a summary right now";
