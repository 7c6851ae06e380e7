//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from
//! specific business logic. Every builder stamps the permissive CORS
//! header so the browser-based viewer can call the API from any origin.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_json_response,
    build_options_response, build_text_response,
};
