/// Normalize a raw host identifier into the form used for key-file names.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_` and the result is
/// lowercased. The bundle directory keeps the raw identifier; this form only
/// appears inside generated content.
pub fn normalize_host(host: &str) -> String {
    host.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
