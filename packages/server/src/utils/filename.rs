/// Name used when an upload carries no filename.
pub const FALLBACK_FILENAME: &str = "document.pdf";

/// The stored filename for an upload: the client's name verbatim, or the fallback.
pub fn stored_filename(upload_name: Option<&str>) -> String {
    match upload_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => FALLBACK_FILENAME.to_string(),
    }
}

/// Build an `attachment` `Content-Disposition` value for an untrusted filename.
///
/// The quoted `filename` keeps printable ASCII only, so CR/LF and quotes can
/// never reach the header. The full name travels in the RFC 5987 `filename*`.
pub fn attachment_disposition(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| (c.is_ascii_graphic() || *c == ' ') && !matches!(c, '"' | '\\'))
        .collect();
    let ascii_name = match ascii_safe.trim() {
        "" => FALLBACK_FILENAME,
        trimmed => trimmed,
    };

    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
