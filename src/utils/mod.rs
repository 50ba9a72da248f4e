use regex::Regex;
use std::sync::LazyLock;

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[A-Za-z]*\s*").expect("valid fence regex"));
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```\s*$").expect("valid fence regex"));

/// Removes a leading ```` ```json ```` (or bare ```` ``` ````) marker and a trailing
/// ```` ``` ```` marker from model output.
pub fn strip_code_fences(text: &str) -> &str {
    let start = OPENING_FENCE.find(text).map_or(0, |m| m.end());
    let rest = &text[start..];
    let end = CLOSING_FENCE.find(rest).map_or(rest.len(), |m| m.start());
    rest[..end].trim()
}

/// Keeps ASCII alphanumerics only, truncated to `max_len` characters.
pub fn sanitize_fragment(text: &str, max_len: usize) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .take(max_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"bullets\": [\"a\"]}\n```";
        assert_eq!(strip_code_fences(raw), "{\"bullets\": [\"a\"]}");
    }

    #[test]
    fn strips_bare_fence_and_whitespace() {
        assert_eq!(strip_code_fences("  ```\n[\"x\"]\n```  \n"), "[\"x\"]");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences(" [1, 2] "), "[1, 2]");
    }

    #[test]
    fn sanitize_drops_punctuation_and_truncates() {
        assert_eq!(sanitize_fragment("Solar panels, on a roof!", 20), "Solarpanelsonaroof");
        assert_eq!(
            sanitize_fragment("abcdefghij klmnopqrstuvwxyz", 20),
            "abcdefghijklmnopqrst"
        );
        assert_eq!(sanitize_fragment("énergie ☀ 2024", 20), "nergie2024");
    }
}
