// API module entry
// Markdown viewer API: file-tree listing and raw file content

mod handlers;
mod query;

pub use handlers::{serve_file_content, serve_file_tree};
