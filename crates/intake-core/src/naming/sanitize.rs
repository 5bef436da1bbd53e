//! Client filename clean-up.

/// Last path component of a client-supplied name.
///
/// Browsers normally send a bare filename, but nothing stops a client from
/// sending `../../etc/passwd` or `C:\Users\x\a.txt`; both separators are
/// treated as directory boundaries.
pub fn client_basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Replaces every space with `_`.
pub fn replace_spaces(name: &str) -> String {
    name.replace(' ', "_")
}

/// Splits at the last `.` into `(stem, extension)`; the extension is empty
/// when there is no dot.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (name, ""),
    }
}
