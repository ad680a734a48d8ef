//! String helpers for report display.

/// Truncate a string to a maximum byte length with ellipsis (UTF-8 safe)
///
/// Newlines are folded to spaces so previews stay on one table row.
pub fn preview(s: &str, max_len: usize) -> String {
    let single_line: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let single_line = single_line.trim();
    if single_line.len() <= max_len {
        single_line.to_string()
    } else {
        let mut end = max_len.saturating_sub(3).min(single_line.len());
        while end > 0 && !single_line.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &single_line[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_ascii() {
        assert_eq!(preview("hello", 10), "hello");
        assert_eq!(preview("hello world", 8), "hello...");
    }

    #[test]
    fn test_preview_folds_newlines() {
        assert_eq!(preview("Paris.\nIt is in France.", 40), "Paris. It is in France.");
    }

    #[test]
    fn test_preview_multibyte_boundary() {
        // 'é' is 2 bytes; cutting inside it must back up
        assert_eq!(preview("ééééé", 6), "é...");
    }
}
