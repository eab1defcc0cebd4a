//! String utilities for the domain layer.

/// Truncate a string to a maximum byte length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Keep the first `max_chars` characters of `s`.
///
/// Returns the (possibly shortened) text and whether anything was cut.
/// Counts Unicode scalar values, matching how tokens are estimated.
pub fn head_chars(s: &str, max_chars: usize) -> (&str, bool) {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&s[..byte_idx], true),
        None => (s, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // 'é' is two bytes; the cut backs off to a char boundary
        assert_eq!(truncate("ééééé", 7), "éé...");
    }

    #[test]
    fn test_head_chars_short_input_untouched() {
        assert_eq!(head_chars("abc", 10), ("abc", false));
        assert_eq!(head_chars("abc", 3), ("abc", false));
    }

    #[test]
    fn test_head_chars_cuts_on_char_count() {
        assert_eq!(head_chars("abcdef", 2), ("ab", true));
        assert_eq!(head_chars("日本語テキスト", 3), ("日本語", true));
    }
}
