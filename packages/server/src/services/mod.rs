pub mod documents;
pub mod extract;
pub mod ingest;
pub mod ocr;
