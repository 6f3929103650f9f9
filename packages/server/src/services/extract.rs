//! Native (non-OCR) text extraction from PDF bytes.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to parse PDF: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// A page whose text could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page_number: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    /// Non-empty page texts joined by `\n`, right-trimmed.
    pub text: String,
    pub pages: usize,
    pub failed_pages: Vec<PageFailure>,
}

/// Extract the embedded text of every page.
///
/// Pages are processed independently: a failing or panicking page is recorded
/// in `failed_pages` and contributes nothing, the rest still get extracted.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    let document = Document::load_mem(bytes)?;
    let pages = document.get_pages();

    let (texts, failed_pages) = collect_pages(pages.keys().copied(), |page_number| {
        document.extract_text(&[page_number])
    });

    Ok(ExtractedText {
        text: texts.join("\n").trim_end().to_string(),
        pages: pages.len(),
        failed_pages,
    })
}

/// Run `extract` for each page, keeping non-empty texts in page order.
fn collect_pages<F, E>(
    page_numbers: impl IntoIterator<Item = u32>,
    mut extract: F,
) -> (Vec<String>, Vec<PageFailure>)
where
    F: FnMut(u32) -> Result<String, E>,
    E: std::fmt::Display,
{
    let mut texts = Vec::new();
    let mut failed_pages = Vec::new();

    for page_number in page_numbers {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| extract(page_number)));
        let reason = match outcome {
            Ok(Ok(text)) => {
                if !text.is_empty() {
                    texts.push(text);
                }
                continue;
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => format!("parser panicked: {}", panic_message(payload.as_ref())),
        };
        failed_pages.push(PageFailure {
            page_number,
            reason,
        });
    }

    (texts, failed_pages)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Best-effort extraction for the upload path: never fails, returns `""` when
/// nothing could be extracted.
///
/// Parsing runs on the blocking pool, so a parser panic also degrades to `""`.
pub async fn extract_text_lossy(bytes: &[u8]) -> String {
    let owned = bytes.to_vec();
    let result = tokio::task::spawn_blocking(move || extract_text(&owned))
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))
        .and_then(|r| r);

    match result {
        Ok(extracted) => {
            for failure in &extracted.failed_pages {
                debug!(
                    page = failure.page_number,
                    reason = %failure.reason,
                    "Skipping page without extractable text"
                );
            }
            extracted.text
        }
        Err(e) => {
            warn!(error = %e, "Native PDF extraction failed");
            String::new()
        }
    }
}
