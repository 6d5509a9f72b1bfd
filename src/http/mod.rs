//! HTTP protocol layer module
//!
//! Response builders and MIME detection, decoupled from file resolution.

pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{build_404_response, build_file_response};
