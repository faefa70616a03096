//! Core business entities.
//!
//! Plain data structures independent of storage or transport concerns.

pub mod click;
pub mod domain;
pub mod link;

pub use click::NewClick;
pub use domain::Domain;
pub use link::{Link, NewLink};
