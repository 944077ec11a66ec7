use unicode_width::UnicodeWidthStr;

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Split a label on `\n`, dropping a trailing `\r` from each line.
pub fn split_lines(s: &str) -> Vec<&str> {
    s.split('\n').map(|line| line.trim_end_matches('\r')).collect()
}

/// A label on one line: its lines joined by single spaces.
pub fn single_line(s: &str) -> String {
    split_lines(s)
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pad `s` with spaces up to `width` display columns.
pub fn pad_to(s: &str, width: usize) -> String {
    let w = display_width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - w))
    }
}
