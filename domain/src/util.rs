//! String helpers for session identifiers and bounded prompt text

/// Cut `s` to at most `max_bytes`, backing up to the previous char boundary
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Lowercase ASCII slug of a session name
///
/// Runs of anything that is not an ASCII letter or digit collapse into a
/// single `-`. The slug never starts or ends with `-` and is at most
/// `max_bytes` long. An empty slug becomes `"session"`.
pub fn slugify(name: &str, max_bytes: usize) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug = truncate_str(&slug, max_bytes).trim_matches('-');
    if slug.is_empty() {
        "session".to_string()
    } else {
        slug.to_string()
    }
}

/// Replace every char outside `[A-Za-z0-9_-]` with `_`
///
/// Keeps a session id usable as a file stem inside a transcript directory.
pub fn file_stem(session_id: &str) -> String {
    session_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
