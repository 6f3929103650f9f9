pub mod filename;
pub mod preview;
