//! Shared utilities: code generation, hashing, and normalization helpers.

pub mod code_generator;
pub mod content_hash;
pub mod host;
pub mod url_normalizer;
