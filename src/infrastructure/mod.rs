//! Infrastructure adapters: persistence, cache, and search backends.

pub mod cache;
pub mod persistence;
pub mod search;
