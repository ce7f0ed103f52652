// src/util.rs — Shared utility functions

/// At most `max_len` bytes of `s`, cut on a char boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

/// One-line preview of user text for logs and status lines.
pub fn preview(s: &str, max_len: usize) -> String {
    let line = s.lines().next().unwrap_or("").trim();
    let cut = truncate_str(line, max_len);
    if cut.len() < line.len() || s.trim().lines().count() > 1 {
        format!("{cut}...")
    } else {
        cut.to_string()
    }
}
