//! Domain layer: entities, repository contracts, and pipeline inputs.

pub mod click_event;
pub mod entities;
pub mod repositories;
pub mod search_task;
