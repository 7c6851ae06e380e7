//! Request handler module
//!
//! Responsible for request routing dispatch: the Markdown API endpoints,
//! the index rewrite for `/`, and generic static file serving.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
