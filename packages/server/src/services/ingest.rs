//! Text resolution for an uploaded PDF: native extraction first, OCR when
//! requested or when the native text is too thin.

use tracing::debug;

use super::extract::extract_text_lossy;
use super::ocr::OcrClient;

/// Native text with this many characters or fewer is treated as "no text layer".
pub const MIN_NATIVE_TEXT_CHARS: usize = 20;

/// Whether native text is substantial enough to skip OCR.
pub fn native_text_ok(text: &str) -> bool {
    text.trim().chars().count() > MIN_NATIVE_TEXT_CHARS
}

/// What to do about OCR once native extraction is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrDecision<'a> {
    /// Native text is good and OCR was not requested.
    NotNeeded,
    /// OCR is wanted but there is no key to call the provider with.
    NoApiKey,
    Run { api_key: &'a str },
}

pub fn decide_ocr<'a>(
    native_text: &str,
    use_ocr: bool,
    api_key: Option<&'a str>,
) -> OcrDecision<'a> {
    if !use_ocr && native_text_ok(native_text) {
        return OcrDecision::NotNeeded;
    }
    match api_key {
        Some(key) if !key.is_empty() => OcrDecision::Run { api_key: key },
        _ => OcrDecision::NoApiKey,
    }
}

/// Final text for a document together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedText {
    pub text: String,
    pub ocr_used: bool,
}

impl ResolvedText {
    /// Merge an OCR result into the native text: OCR wins only when it produced something.
    pub fn merge(native: String, ocr: String) -> Self {
        if ocr.is_empty() {
            Self {
                text: native,
                ocr_used: false,
            }
        } else {
            Self {
                text: ocr,
                ocr_used: true,
            }
        }
    }

    fn native(text: String) -> Self {
        Self {
            text,
            ocr_used: false,
        }
    }
}

/// Resolve the text to store for `pdf`. Never fails: extraction and OCR
/// problems fall back to whatever text is already available.
pub async fn resolve_text(
    pdf: &[u8],
    use_ocr: bool,
    api_key: Option<&str>,
    ocr: &OcrClient,
) -> ResolvedText {
    let native = extract_text_lossy(pdf).await;

    match decide_ocr(&native, use_ocr, api_key) {
        OcrDecision::NotNeeded => ResolvedText::native(native),
        OcrDecision::NoApiKey => {
            debug!("OCR wanted but no API key supplied, keeping native text");
            ResolvedText::native(native)
        }
        OcrDecision::Run { api_key } => {
            let ocr_text = ocr.recognize_lossy(pdf, api_key).await;
            ResolvedText::merge(native, ocr_text)
        }
    }
}
