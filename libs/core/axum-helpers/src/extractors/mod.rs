//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with the standard JSON error body.

pub mod id_path;
pub mod json_body;

pub use id_path::IdPath;
pub use json_body::JsonBody;
