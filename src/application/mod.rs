//! Application layer: use-case services built on domain traits.

pub mod services;
