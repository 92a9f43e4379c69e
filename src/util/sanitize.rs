use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// CSI sequences (ESC[ ... cmd); covers the styling/movement codes seen in practice.
static ANSI_CSI: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]").ok());

/// Keeps absolute `http`/`https` links; anything else (script URLs, data
/// URLs, relative or unparseable text) becomes empty.
pub fn web_link(candidate: &str) -> String {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match Url::parse(trimmed) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => u.into(),
        _ => String::new(),
    }
}

// Strip ANSI escapes and control chars from API text before it reaches the terminal.
// Newlines/tabs collapse to spaces; output is capped so one headline stays on one line.
pub fn sanitize_for_terminal(s: &str) -> String {
    let no_ansi = match ANSI_CSI.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    };

    let cleaned: String = no_ansi
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch })
        .filter(|ch| !ch.is_control())
        .collect();

    cleaned.trim().chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_link_keeps_only_http_schemes() {
        assert_eq!(
            web_link("https://www.nytimes.com/2024/05/01/nyregion/a.html"),
            "https://www.nytimes.com/2024/05/01/nyregion/a.html"
        );
        assert_eq!(web_link(" http://example.com/x "), "http://example.com/x");
        assert_eq!(web_link("javascript:alert(document.cookie)"), "");
        assert_eq!(web_link("JavaScript:alert(1)"), "");
        assert_eq!(web_link("data:text/html,<script>alert(1)</script>"), "");
        assert_eq!(web_link("/relative/path.html"), "");
        assert_eq!(web_link(""), "");
    }

    #[test]
    fn terminal_text_loses_escapes_and_newlines() {
        assert_eq!(
            sanitize_for_terminal("  \x1B[31mRed\x1B[0m\nheadline\x07 "),
            "Red headline"
        );
        assert_eq!(sanitize_for_terminal(&"x".repeat(300)).len(), 200);
    }
}
