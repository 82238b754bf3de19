//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_normalizer`] - Normalization of submitted URLs
//! - [`base_url`] - Short URL composition from request headers

pub mod base_url;
pub mod code_generator;
pub mod url_normalizer;
