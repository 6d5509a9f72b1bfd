//! Request handler module
//!
//! GET-only static file serving with reload script injection.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
