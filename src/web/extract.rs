use regex::Regex;
use tracing::debug;

/// Wide enough that paragraphs are not re-wrapped into extra lines.
const RENDER_WIDTH: usize = 1_000;

/// Best-effort plain text of an HTML document.
///
/// Markup html2text cannot render yields an empty string. Link footnotes and
/// blank lines are dropped so only readable prose reaches the summarizer.
#[must_use]
pub fn extract_content(raw: &[u8]) -> String {
    static FOOTNOTE_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
        Regex::new(r"^\[\d+\]:\s").unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
    });

    let rendered = match html2text::from_read(raw, RENDER_WIDTH) {
        Ok(text) => text,
        Err(e) => {
            debug!("Content extraction failed: {}", e);
            return String::new();
        }
    };

    rendered
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty() && !FOOTNOTE_RE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}
