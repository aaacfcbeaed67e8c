/// Effective display interval for a file.
///
/// A filename token of 0 means "unspecified" and falls back to the configured default.
pub fn resolve_interval(token: u32, default_secs: u32) -> u32 {
    if token > 0 { token } else { default_secs }
}
