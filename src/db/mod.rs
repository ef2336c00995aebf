pub mod jobs;
pub mod members;
pub mod profiles;
pub mod tokens;

/// Build an `ILIKE` substring pattern, escaping the wildcard characters in `q`.
/// Returns `None` for blank input so the filter is skipped.
pub fn like_pattern(q: Option<&str>) -> Option<String> {
    let q = q?.trim();
    if q.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(q.len() + 2);
    escaped.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}
