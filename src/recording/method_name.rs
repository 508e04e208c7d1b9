//! Shortened qualified method names.

/// Abbreviate every segment of `declaring_type` except the last to its
/// first character, then append `method`.
///
/// Accepts `.` and `::` separators: `my_app::repo::InstrumentRepo` and
/// `find` become `m.r.InstrumentRepo.find`.
pub fn shorten(declaring_type: &str, method: &str) -> String {
    let normalized = declaring_type.replace("::", ".");
    let segments: Vec<&str> = normalized.split('.').filter(|s| !s.is_empty()).collect();

    let mut out = String::with_capacity(normalized.len() + method.len() + 1);
    if let Some((last, prefix)) = segments.split_last() {
        for segment in prefix {
            if let Some(first) = segment.chars().next() {
                out.push(first);
                out.push('.');
            }
        }
        out.push_str(last);
        out.push('.');
    }
    out.push_str(method);
    out
}
