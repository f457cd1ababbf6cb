//! Progress-noise filtering for captured compiler and installer output.
//!
//! winget and `dotnet publish` redraw spinners and byte counters that are
//! meaningless once captured. The raw transcript is always persisted
//! verbatim to the phase log; this filter only shapes what gets rendered.

use std::sync::LazyLock;

use regex::Regex;

/// A line consisting solely of a spinner glyph.
static SPINNER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-\\|/]\s*$").expect("spinner pattern"));

/// Percentages and KB/MB/GB byte counters.
static PROGRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b\d{1,3}\s*%|\b\d+(?:\.\d+)?\s*(?:KB|MB|GB)\s*/\s*\d+(?:\.\d+)?\s*(?:KB|MB|GB))",
    )
    .expect("progress pattern")
});

/// Normalize CRLF and bare CR line endings to LF.
pub fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Whether a progress-looking line still carries information worth showing.
fn is_meaningful(line: &str) -> bool {
    line.to_lowercase().contains("http")
        || line.contains("Microsoft.DotNet")
        || line.contains("Installer")
}

/// Drop spinner redraws and byte-counter spam, collapsing blank runs to a
/// single blank line. Lines that mention a URL, a package id, or an
/// installer are kept even when they look like progress output.
pub fn filter_noisy_progress<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut cleaned = Vec::new();
    let mut blank_run = 0usize;

    for line in lines {
        let raw = line.trim_end_matches('\n');

        if raw.trim().is_empty() {
            blank_run += 1;
            if blank_run <= 1 {
                cleaned.push(String::new());
            }
            continue;
        }
        blank_run = 0;

        if SPINNER_RE.is_match(raw) {
            continue;
        }

        let has_bar_glyphs = raw.contains('█') || raw.contains('▒') || raw.contains('░');
        if has_bar_glyphs || PROGRESS_RE.is_match(raw) {
            if is_meaningful(raw) {
                cleaned.push(raw.to_string());
            }
            continue;
        }

        cleaned.push(raw.to_string());
    }

    cleaned
}

/// Filter an entire captured transcript into displayable lines,
/// dropping the leftover blanks.
pub fn display_lines(transcript: &str) -> Vec<String> {
    let normalized = normalize_newlines(transcript);
    filter_noisy_progress(normalized.split('\n'))
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_spinner_lines_dropped() {
        let lines = filter_noisy_progress(["  \\  ", "real output", " / "]);
        assert_eq!(lines, vec!["real output"]);
    }

    #[test]
    fn test_percent_lines_dropped() {
        let lines = filter_noisy_progress(["Downloading 42 %", "Restored project"]);
        assert_eq!(lines, vec!["Restored project"]);
    }

    #[test]
    fn test_byte_counter_dropped() {
        let lines = filter_noisy_progress(["   1.2 MB / 56.0 MB", "done"]);
        assert_eq!(lines, vec!["done"]);
    }

    #[test]
    fn test_meaningful_progress_kept() {
        let lines = filter_noisy_progress([
            "Found Microsoft.DotNet.SDK.8 100%",
            "fetching https://example.com/sdk 50 %",
        ]);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_blank_runs_collapse() {
        let lines = filter_noisy_progress(["a", "", "", "", "b"]);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_display_lines_drops_blanks() {
        let lines = display_lines("a\r\n\r\n\r\nb\r\n");
        assert_eq!(lines, vec!["a", "b"]);
    }
}
