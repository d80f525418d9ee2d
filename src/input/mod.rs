//! Input loading
//! Reads candidate and job records from disk, flattening markdown postings to text

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;
