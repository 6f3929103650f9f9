/// Preview length in upload responses.
pub const UPLOAD_PREVIEW_CHARS: usize = 300;
/// Preview length per item in list responses.
pub const LIST_PREVIEW_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// The first `max_chars` characters of `text`, followed by `...` if anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
